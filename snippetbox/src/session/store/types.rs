use async_trait::async_trait;

use crate::session::errors::SessionError;
use crate::session::types::SessionRecord;

/// Backing storage for session records, addressed by session token.
///
/// Implementations synchronize internally; callers share them behind an `Arc`.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Verify the store is reachable. Called once at startup.
    async fn init(&self) -> Result<(), SessionError>;

    /// Fetch a live record. Expired records are reported as absent.
    async fn load(&self, token: &str) -> Result<Option<SessionRecord>, SessionError>;

    /// Insert or replace a record; it lives until `record.expires_at`.
    async fn save(&self, token: &str, record: &SessionRecord) -> Result<(), SessionError>;

    async fn delete(&self, token: &str) -> Result<(), SessionError>;
}
