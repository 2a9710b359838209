mod config;
mod csrf;
mod errors;
mod manager;
mod store;
mod types;

pub use config::{
    CSRF_COOKIE_MAX_AGE, CSRF_COOKIE_NAME, SESSION_COOKIE_NAME, SESSION_LIFETIME, SessionConfig,
};
pub use csrf::{
    CSRF_FORM_FIELD, CSRF_HEADER_NAME, CsrfError, CsrfToken, csrf_secret, ensure_csrf_secret,
    issue_csrf_token, new_csrf_cookie_value, verify_csrf_token,
};
pub use errors::SessionError;
pub use manager::SessionManager;
pub use store::{MemorySessionStore, RedisSessionStore, SessionStore};
pub use types::{Session, SessionRecord, SessionStatus};
