use async_trait::async_trait;
use chrono::Utc;
use redis::{self, AsyncCommands};

use crate::session::errors::SessionError;
use crate::session::types::SessionRecord;

use super::types::SessionStore;

const KEY_PREFIX: &str = "session";

/// Session store shared between instances through Redis
pub struct RedisSessionStore {
    client: redis::Client,
}

impl RedisSessionStore {
    pub fn new(url: &str) -> Result<Self, SessionError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    fn make_key(token: &str) -> String {
        format!("{KEY_PREFIX}:{token}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn init(&self) -> Result<(), SessionError> {
        // Verify the connection works
        let _conn = self.client.get_multiplexed_async_connection().await?;
        Ok(())
    }

    async fn load(&self, token: &str) -> Result<Option<SessionRecord>, SessionError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let value: Option<String> = conn.get(Self::make_key(token)).await?;

        match value {
            Some(v) => {
                let record: SessionRecord = serde_json::from_str(&v)?;
                Ok((!record.is_expired()).then_some(record))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, token: &str, record: &SessionRecord) -> Result<(), SessionError> {
        let ttl = (record.expires_at - Utc::now()).num_seconds();
        if ttl <= 0 {
            return self.delete(token).await;
        }

        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(token);
        let value = serde_json::to_string(record)?;
        let _: () = conn.set(&key, value).await?;
        let _: () = conn.expire(&key, ttl).await?;

        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<(), SessionError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let _: () = conn.del(Self::make_key(token)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key() {
        assert_eq!(RedisSessionStore::make_key("abc"), "session:abc");
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(RedisSessionStore::new("not a url").is_err());
    }

    #[test]
    fn test_new_accepts_redis_url() {
        assert!(RedisSessionStore::new("redis://127.0.0.1:6379").is_ok());
    }
}
