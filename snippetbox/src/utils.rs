use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use http::header::{HeaderMap, SET_COOKIE};
use ring::rand::SecureRandom;
use thiserror::Error;

pub(crate) fn base64url_decode(input: &str) -> Result<Vec<u8>, UtilError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|_| UtilError::Format("Failed to decode base64url".to_string()))?;
    Ok(decoded)
}

pub(crate) fn base64url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

pub(crate) fn gen_random_bytes(len: usize) -> Result<Vec<u8>, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| UtilError::Crypto("Failed to generate random bytes".to_string()))?;
    Ok(bytes)
}

/// Generate `len` random bytes and return them base64url encoded without padding.
pub fn gen_random_string(len: usize) -> Result<String, UtilError> {
    let bytes = gen_random_bytes(len)?;
    Ok(base64url_encode(&bytes))
}

/// Attributes shared by every cookie this application issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieAttributes {
    pub secure: bool,
    pub same_site_lax: bool,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            secure: true,
            same_site_lax: true,
        }
    }
}

/// Append a `Set-Cookie` header. A non-positive `max_age` expires the cookie immediately.
pub fn header_set_cookie(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
    max_age: i64,
    attributes: CookieAttributes,
) -> Result<(), UtilError> {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly");
    if max_age > 0 {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    } else {
        cookie.push_str("; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
    }
    if attributes.secure {
        cookie.push_str("; Secure");
    }
    if attributes.same_site_lax {
        cookie.push_str("; SameSite=Lax");
    }

    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| UtilError::Cookie(format!("Failed to build cookie {name}")))?,
    );
    Ok(())
}

/// Format a timestamp the way pages display it, e.g. `02 Jun 2024 at 03:27`.
///
/// The Unix epoch is treated as "no time" and renders as an empty string.
pub fn human_date(t: &DateTime<Utc>) -> String {
    if t.timestamp() == 0 {
        return String::new();
    }
    t.format("%d %b %Y at %H:%M").to_string()
}

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Cookie error: {0}")]
    Cookie(String),

    #[error("Invalid format: {0}")]
    Format(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_gen_random_string_length_and_uniqueness() {
        let a = gen_random_string(32).unwrap();
        let b = gen_random_string(32).unwrap();

        // 32 bytes base64url without padding is 43 characters
        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
        assert!(
            a.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_base64url_roundtrip_rejects_garbage() {
        let encoded = base64url_encode(b"hello");
        assert_eq!(base64url_decode(&encoded).unwrap(), b"hello");
        assert!(base64url_decode("not base64!").is_err());
    }

    #[test]
    fn test_header_set_cookie_attributes() {
        let mut headers = HeaderMap::new();
        header_set_cookie(
            &mut headers,
            "session",
            "abc",
            3600,
            CookieAttributes::default(),
        )
        .unwrap();

        let value = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(value.starts_with("session=abc;"));
        assert!(value.contains("Path=/"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("Secure"));
        assert!(value.contains("SameSite=Lax"));
        assert!(value.contains("Max-Age=3600"));
    }

    #[test]
    fn test_header_set_cookie_expired() {
        let mut headers = HeaderMap::new();
        header_set_cookie(
            &mut headers,
            "session",
            "",
            -1,
            CookieAttributes {
                secure: false,
                same_site_lax: false,
            },
        )
        .unwrap();

        let value = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(value.contains("Max-Age=0"));
        assert!(!value.contains("Secure"));
    }

    #[test]
    fn test_header_set_cookie_rejects_invalid_value() {
        let mut headers = HeaderMap::new();
        let result = header_set_cookie(
            &mut headers,
            "session",
            "bad\nvalue",
            60,
            CookieAttributes::default(),
        );
        assert!(matches!(result, Err(UtilError::Cookie(_))));
    }

    #[test]
    fn test_human_date() {
        let utc = Utc.with_ymd_and_hms(2024, 6, 2, 3, 27, 0).unwrap();
        assert_eq!(human_date(&utc), "02 Jun 2024 at 03:27");

        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(human_date(&epoch), "");

        let cet = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2022, 3, 17, 10, 15, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(human_date(&cet), "17 Mar 2022 at 09:15");
    }
}
