use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::models::{ModelError, UserId, UserRepository};

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: Pool<Sqlite>,
}

impl SqliteUserRepository {
    /// Wrap a pool, creating the users table if it does not exist yet.
    pub async fn new(pool: Pool<Sqlite>) -> Result<Self, ModelError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                hashed_password TEXT NOT NULL,
                created TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS users_uc_email ON users(email)")
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }
}

// Hashing is CPU bound, keep it off the async workers.
async fn hash_password(password: &str) -> Result<String, ModelError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ModelError::Storage(format!("Failed to hash password: {e}")))
    })
    .await
    .map_err(|e| ModelError::Storage(e.to_string()))?
}

async fn verify_password(password: &str, hashed: &str) -> Result<bool, ModelError> {
    let password = password.to_string();
    let hashed = hashed.to_string();
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hashed)
            .map_err(|e| ModelError::Storage(format!("Corrupt password hash: {e}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| ModelError::Storage(e.to_string()))?
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), ModelError> {
        let hashed_password = hash_password(password).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, hashed_password, created)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(hashed_password)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(ModelError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<UserId, ModelError> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, hashed_password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, hashed_password)) = row else {
            return Err(ModelError::InvalidCredentials);
        };

        if verify_password(password, &hashed_password).await? {
            Ok(id)
        } else {
            Err(ModelError::InvalidCredentials)
        }
    }

    async fn exists(&self, id: UserId) -> Result<bool, ModelError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::connect_sqlite;

    async fn repository() -> SqliteUserRepository {
        let pool = connect_sqlite("sqlite::memory:").await.unwrap();
        SqliteUserRepository::new(pool).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_authenticate() {
        let repo = repository().await;

        repo.insert("Alice", "alice@example.com", "pa55word!")
            .await
            .unwrap();

        let id = repo
            .authenticate("alice@example.com", "pa55word!")
            .await
            .unwrap();
        assert!(repo.exists(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let repo = repository().await;

        repo.insert("Alice", "alice@example.com", "pa55word!")
            .await
            .unwrap();
        let result = repo.insert("Other", "alice@example.com", "different1").await;

        assert_eq!(result, Err(ModelError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_invalid_credentials() {
        let repo = repository().await;
        repo.insert("Alice", "alice@example.com", "pa55word!")
            .await
            .unwrap();

        assert_eq!(
            repo.authenticate("alice@example.com", "wrong-password").await,
            Err(ModelError::InvalidCredentials)
        );
        assert_eq!(
            repo.authenticate("nobody@example.com", "pa55word!").await,
            Err(ModelError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_exists_unknown_id() {
        let repo = repository().await;
        assert!(!repo.exists(99).await.unwrap());
    }
}
