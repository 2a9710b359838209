use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::session::errors::SessionError;
use crate::session::types::SessionRecord;

use super::types::SessionStore;

/// Process-local session store, suitable for a single instance and for tests
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entry: Mutex<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session store");
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, SessionRecord>> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop every expired record and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, record| !record.is_expired());
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn init(&self) -> Result<(), SessionError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn load(&self, token: &str) -> Result<Option<SessionRecord>, SessionError> {
        let mut entries = self.entries();
        match entries.get(token) {
            Some(record) if record.is_expired() => {
                entries.remove(token);
                Ok(None)
            }
            Some(record) => Ok(Some(record.clone())),
            None => Ok(None),
        }
    }

    async fn save(&self, token: &str, record: &SessionRecord) -> Result<(), SessionError> {
        self.entries().insert(token.to_string(), record.clone());
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<(), SessionError> {
        self.entries().remove(token);
        Ok(())
    }
}
