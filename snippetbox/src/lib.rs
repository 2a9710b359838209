//! snippetbox - Core library for the snippetbox web application
//!
//! This crate holds everything that does not depend on the HTTP framework:
//! domain models and their SQLite repositories, server-side sessions with
//! pluggable stores, CSRF tokens, the authentication state machine and form
//! validation.

mod auth;
mod models;
mod session;
mod storage;
mod utils;
mod validator;

#[cfg(test)]
mod test_utils;

pub use auth::{
    AUTHENTICATED_USER_ID_KEY, AuthError, Principal, REDIRECT_AFTER_LOGIN_KEY, login, logout,
    resolve_principal, take_redirect_after_login,
};

pub use models::{ModelError, Snippet, SnippetRepository, UserId, UserRepository};

pub use session::{
    CSRF_COOKIE_MAX_AGE, CSRF_COOKIE_NAME, CSRF_FORM_FIELD, CSRF_HEADER_NAME, CsrfError,
    CsrfToken, MemorySessionStore, RedisSessionStore, SESSION_COOKIE_NAME, SESSION_LIFETIME,
    Session, SessionConfig, SessionError, SessionManager, SessionRecord, SessionStatus,
    SessionStore, csrf_secret, ensure_csrf_secret, issue_csrf_token, new_csrf_cookie_value,
    verify_csrf_token,
};

pub use storage::{SqliteSnippetRepository, SqliteUserRepository, connect_sqlite};

pub use utils::{CookieAttributes, UtilError, gen_random_string, header_set_cookie, human_date};

pub use validator::{
    EMAIL_RX, Validator, matches, max_chars, min_chars, not_blank, permitted_value,
};
