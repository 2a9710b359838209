use std::sync::LazyLock;
use std::time::Duration;

use crate::utils::CookieAttributes;

pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or("session".to_string())
});

/// Absolute lifetime of a session, counted from its creation.
pub static SESSION_LIFETIME: LazyLock<Duration> = LazyLock::new(|| {
    let secs = std::env::var("SESSION_LIFETIME_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(12 * 60 * 60); // Default to 12 hours if not set or invalid
    Duration::from_secs(secs)
});

pub static CSRF_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CSRF_COOKIE_NAME")
        .ok()
        .unwrap_or("csrf_token".to_string())
});

pub static CSRF_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("CSRF_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(365 * 24 * 60 * 60)
});

/// Cookie and lifetime settings used by the session manager and the CSRF layer
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub lifetime: Duration,
    pub csrf_cookie_name: String,
    pub csrf_cookie_max_age: u64,
    pub cookie_attributes: CookieAttributes,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: SESSION_COOKIE_NAME.clone(),
            lifetime: *SESSION_LIFETIME,
            csrf_cookie_name: CSRF_COOKIE_NAME.clone(),
            csrf_cookie_max_age: *CSRF_COOKIE_MAX_AGE,
            cookie_attributes: CookieAttributes::default(),
        }
    }
}
