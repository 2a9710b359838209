//! Masked CSRF tokens bound to a per-session secret and a per-client cookie.
//!
//! A form token is `base64url(nonce || HMAC-SHA256(secret, nonce || cookie_value))`.
//! Every rendering gets a fresh nonce, so tokens differ between pages while all of
//! them stay valid for the same session and cookie.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::utils::{UtilError, base64url_decode, base64url_encode, gen_random_bytes, gen_random_string};

use super::errors::SessionError;
use super::types::Session;

type HmacSha256 = Hmac<Sha256>;

/// Form field carrying the token on state-changing requests
pub const CSRF_FORM_FIELD: &str = "csrf_token";

/// Header accepted as an alternative to the form field
pub const CSRF_HEADER_NAME: &str = "X-CSRF-Token";

const CSRF_SECRET_KEY: &str = "csrfSecret";
const NONCE_LEN: usize = 16;
const MAC_LEN: usize = 32;

/// Token embedded into rendered forms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CsrfToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum CsrfError {
    #[error("CSRF token missing")]
    Missing,

    #[error("CSRF token malformed")]
    Malformed,

    #[error("CSRF token mismatch")]
    Mismatch,

    #[error("Session has no CSRF secret")]
    NoSecret,

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Utils error: {0}")]
    Util(#[from] UtilError),
}

/// Value for the long-lived CSRF cookie.
pub fn new_csrf_cookie_value() -> Result<String, CsrfError> {
    Ok(gen_random_string(32)?)
}

/// Return the session's CSRF secret, creating it on first use.
pub fn ensure_csrf_secret(session: &Session) -> Result<String, CsrfError> {
    if let Some(secret) = session.get::<String>(CSRF_SECRET_KEY) {
        return Ok(secret);
    }
    let secret = gen_random_string(32)?;
    session.insert(CSRF_SECRET_KEY, &secret)?;
    tracing::debug!("Created CSRF secret for session");
    Ok(secret)
}

/// The session's CSRF secret without creating one.
pub fn csrf_secret(session: &Session) -> Option<String> {
    session.get::<String>(CSRF_SECRET_KEY)
}

fn mac_for(secret: &str, nonce: &[u8], cookie_value: &str) -> Result<HmacSha256, CsrfError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| UtilError::Crypto("Invalid HMAC key".to_string()))?;
    mac.update(nonce);
    mac.update(cookie_value.as_bytes());
    Ok(mac)
}

/// Mint a fresh token for `secret` and the client's CSRF cookie value.
pub fn issue_csrf_token(secret: &str, cookie_value: &str) -> Result<CsrfToken, CsrfError> {
    let nonce = gen_random_bytes(NONCE_LEN)?;
    let tag = mac_for(secret, &nonce, cookie_value)?.finalize().into_bytes();

    let mut raw = nonce;
    raw.extend_from_slice(&tag);
    Ok(CsrfToken(base64url_encode(&raw)))
}

/// Check a submitted token in constant time.
pub fn verify_csrf_token(
    secret: &str,
    cookie_value: &str,
    submitted: &str,
) -> Result<(), CsrfError> {
    if submitted.is_empty() {
        return Err(CsrfError::Missing);
    }
    let raw = base64url_decode(submitted).map_err(|_| CsrfError::Malformed)?;
    if raw.len() != NONCE_LEN + MAC_LEN {
        return Err(CsrfError::Malformed);
    }
    let (nonce, tag) = raw.split_at(NONCE_LEN);

    let expected = mac_for(secret, nonce, cookie_value)?.finalize().into_bytes();
    if expected.as_slice().ct_eq(tag).into() {
        Ok(())
    } else {
        Err(CsrfError::Mismatch)
    }
}
