use async_trait::async_trait;

use super::{ModelError, Snippet, UserId};

/// Persistent storage of snippets
#[async_trait]
pub trait SnippetRepository: Send + Sync + 'static {
    /// Store a new snippet that expires `expires_days` from now and return its id.
    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_days: u32,
    ) -> Result<i64, ModelError>;

    /// Fetch an unexpired snippet, or `ModelError::NoRecord`.
    async fn get(&self, id: i64) -> Result<Snippet, ModelError>;

    /// The most recently created unexpired snippets, newest first.
    async fn latest(&self, limit: usize) -> Result<Vec<Snippet>, ModelError>;
}

/// Persistent storage of user accounts
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Create an account. Fails with `ModelError::DuplicateEmail` if the email is taken.
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), ModelError>;

    /// Verify credentials and return the account id, or `ModelError::InvalidCredentials`.
    async fn authenticate(&self, email: &str, password: &str) -> Result<UserId, ModelError>;

    async fn exists(&self, id: UserId) -> Result<bool, ModelError>;
}
