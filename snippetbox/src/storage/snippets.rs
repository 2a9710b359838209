use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::{Pool, Sqlite};

use crate::models::{ModelError, Snippet, SnippetRepository};

#[derive(Clone)]
pub struct SqliteSnippetRepository {
    pool: Pool<Sqlite>,
}

impl SqliteSnippetRepository {
    /// Wrap a pool, creating the snippets table if it does not exist yet.
    pub async fn new(pool: Pool<Sqlite>) -> Result<Self, ModelError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS snippets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                created TIMESTAMP NOT NULL,
                expires TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_snippets_created ON snippets(created)")
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl SnippetRepository for SqliteSnippetRepository {
    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_days: u32,
    ) -> Result<i64, ModelError> {
        let created = Utc::now();
        let expires = created + Duration::days(i64::from(expires_days));

        let result = sqlx::query(
            r#"
            INSERT INTO snippets (title, content, created, expires)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(created)
        .bind(expires)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn get(&self, id: i64) -> Result<Snippet, ModelError> {
        sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, title, content, created, expires FROM snippets
            WHERE expires > ? AND id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ModelError::NoRecord)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Snippet>, ModelError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let snippets = sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, title, content, created, expires FROM snippets
            WHERE expires > ? ORDER BY created DESC, id DESC LIMIT ?
            "#,
        )
        .bind(Utc::now())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(snippets)
    }
}
