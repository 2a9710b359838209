use std::sync::Arc;

use chrono::{Duration, Utc};
use headers::{Cookie, HeaderMapExt};
use http::header::HeaderMap;

use crate::utils::{gen_random_string, header_set_cookie};

use super::config::SessionConfig;
use super::errors::SessionError;
use super::store::SessionStore;
use super::types::{Session, SessionRecord, SessionStatus};

/// Loads sessions from and commits them back to a [`SessionStore`],
/// translating between tokens and the session cookie.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read a cookie value from request headers.
    pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
        headers
            .typed_get::<Cookie>()
            .and_then(|cookies| cookies.get(name).map(str::to_string))
    }

    /// Load the session named by the request's session cookie.
    ///
    /// A missing, unknown or expired token yields a fresh, empty session without a
    /// token; a new token is only minted when that session is first committed.
    pub async fn load(&self, headers: &HeaderMap) -> Result<Session, SessionError> {
        if let Some(token) = Self::cookie_value(headers, &self.config.cookie_name) {
            if let Some(record) = self.store.load(&token).await? {
                tracing::trace!("Loaded session expiring at {}", record.expires_at);
                return Ok(Session::new(Some(token), record));
            }
            tracing::debug!("Session cookie did not match a live session");
        }

        Ok(Session::new(None, self.fresh_record()))
    }

    fn fresh_record(&self) -> SessionRecord {
        let lifetime = Duration::from_std(self.config.lifetime).unwrap_or(Duration::hours(12));
        SessionRecord::new(Utc::now() + lifetime)
    }

    /// Persist any change made to the session and return the `Set-Cookie`
    /// headers the response must carry. Unmodified sessions produce no headers.
    pub async fn commit(&self, session: &Session) -> Result<HeaderMap, SessionError> {
        let snapshot = session.snapshot();
        let mut headers = HeaderMap::new();
        let cookie_name = self.config.cookie_name.as_str();
        let attributes = self.config.cookie_attributes;

        match snapshot.status {
            SessionStatus::Unmodified => {}
            SessionStatus::Destroyed => {
                for token in [snapshot.token, snapshot.stale_token].into_iter().flatten() {
                    self.store.delete(&token).await?;
                }
                header_set_cookie(&mut headers, cookie_name, "", -1, attributes)?;
                session.mark_committed(None);
                tracing::debug!("Session destroyed");
            }
            SessionStatus::Modified => {
                if let Some(stale) = snapshot.stale_token.as_deref() {
                    self.store.delete(stale).await?;
                }
                let token = match snapshot.token {
                    Some(token) => token,
                    None => gen_random_string(32)?,
                };
                self.store.save(&token, &snapshot.record).await?;

                let max_age = (snapshot.record.expires_at - Utc::now()).num_seconds();
                header_set_cookie(&mut headers, cookie_name, &token, max_age, attributes)?;
                session.mark_committed(Some(token));
            }
        }

        Ok(headers)
    }

    /// Persist changes under the token the client already holds, for exits where
    /// no `Set-Cookie` can reach the client. A pending renewal is not applied and
    /// a session the client has no token for is not stored.
    pub async fn commit_in_place(&self, session: &Session) -> Result<(), SessionError> {
        let snapshot = session.snapshot();
        let Some(token) = snapshot.stale_token.or(snapshot.token) else {
            if snapshot.status != SessionStatus::Unmodified {
                tracing::debug!("Dropping changes to a session the client holds no token for");
            }
            return Ok(());
        };

        match snapshot.status {
            SessionStatus::Unmodified => {}
            SessionStatus::Destroyed => self.store.delete(&token).await?,
            SessionStatus::Modified => self.store.save(&token, &snapshot.record).await?,
        }
        session.mark_committed(Some(token));
        Ok(())
    }
}
