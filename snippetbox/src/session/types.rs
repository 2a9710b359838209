use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::errors::SessionError;

/// What a session store persists for one token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub values: HashMap<String, serde_json::Value>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(expires_at: DateTime<Utc>) -> Self {
        Self {
            values: HashMap::new(),
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unmodified,
    Modified,
    Destroyed,
}

#[derive(Debug)]
struct SessionInner {
    token: Option<String>,
    // Token to delete from the store on commit after a renewal
    stale_token: Option<String>,
    record: SessionRecord,
    status: SessionStatus,
}

/// Request-scoped handle on the session data.
///
/// Cloning is cheap and every clone sees the same data, so a handler's changes are
/// visible to the layer that commits the session after the handler returns. The
/// internal lock is never held across an `.await`.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionInner>>,
}

impl Session {
    pub(crate) fn new(token: Option<String>, record: SessionRecord) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                token,
                stale_token: None,
                record,
                status: SessionStatus::Unmodified,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The token this session was loaded with, if any.
    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.lock().status
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.lock().record.expires_at
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().record.values.contains_key(key)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.lock().record.values.get(key).cloned()?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Session value {} has unexpected type: {}", key, e);
                None
            }
        }
    }

    pub fn insert<T: Serialize>(&self, key: &str, value: T) -> Result<(), SessionError> {
        let value = serde_json::to_value(value)?;
        let mut inner = self.lock();
        inner.record.values.insert(key.to_string(), value);
        inner.status = SessionStatus::Modified;
        Ok(())
    }

    pub fn remove(&self, key: &str) {
        let mut inner = self.lock();
        if inner.record.values.remove(key).is_some() {
            inner.status = SessionStatus::Modified;
        }
    }

    /// Remove a value and return it. Used for one-shot values such as flash messages.
    pub fn pop<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = {
            let mut inner = self.lock();
            let value = inner.record.values.remove(key)?;
            inner.status = SessionStatus::Modified;
            value
        };
        serde_json::from_value(value).ok()
    }

    /// Keep the data but move it to a fresh token on commit.
    pub fn renew_token(&self) {
        let mut inner = self.lock();
        if let Some(old) = inner.token.take() {
            inner.stale_token = Some(old);
        }
        inner.status = SessionStatus::Modified;
    }

    /// Drop all data; the store entry and the cookie are removed on commit.
    pub fn destroy(&self) {
        let mut inner = self.lock();
        inner.record.values.clear();
        inner.status = SessionStatus::Destroyed;
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot {
            token: inner.token.clone(),
            stale_token: inner.stale_token.clone(),
            record: inner.record.clone(),
            status: inner.status,
        }
    }

    /// Record the outcome of a commit so a second commit is a no-op.
    pub(crate) fn mark_committed(&self, token: Option<String>) {
        let mut inner = self.lock();
        inner.token = token;
        inner.stale_token = None;
        inner.status = SessionStatus::Unmodified;
    }
}

pub(crate) struct SessionSnapshot {
    pub(crate) token: Option<String>,
    pub(crate) stale_token: Option<String>,
    pub(crate) record: SessionRecord,
    pub(crate) status: SessionStatus,
}
