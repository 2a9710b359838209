use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{
    HeaderMap, Method, StatusCode,
    header::{CONTENT_TYPE, SET_COOKIE},
};

use snippetbox::{
    CSRF_FORM_FIELD, CSRF_HEADER_NAME, CsrfError, Session, SessionConfig, SessionManager,
    csrf_secret, ensure_csrf_secret, header_set_cookie, issue_csrf_token, new_csrf_cookie_value,
    verify_csrf_token,
};

use crate::error::AppError;
use crate::pipeline::Interceptor;

const MAX_FORM_BYTES: usize = 1024 * 1024;

/// Reject state-changing requests without a valid anti-forgery token and hand
/// every request a fresh token for the forms it renders.
pub struct CsrfProtect {
    config: SessionConfig,
}

impl CsrfProtect {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

fn form_token(body: &Bytes) -> Option<String> {
    url::form_urlencoded::parse(body)
        .find(|(key, _)| key == CSRF_FORM_FIELD)
        .map(|(_, value)| value.into_owned())
}

/// Find the submitted token, buffering a form body so the handler can still read it.
async fn submitted_token(req: Request) -> Result<(Request, Option<String>), AppError> {
    if let Some(token) = req
        .headers()
        .get(CSRF_HEADER_NAME)
        .and_then(|v| v.to_str().ok())
    {
        let token = token.to_string();
        return Ok((req, Some(token)));
    }
    if !is_form(req.headers()) {
        return Ok((req, None));
    }

    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_FORM_BYTES)
        .await
        .map_err(|e| {
            tracing::debug!("Failed to read form body: {}", e);
            AppError::ClientError(StatusCode::BAD_REQUEST)
        })?;
    let token = form_token(&bytes);
    Ok((Request::from_parts(parts, Body::from(bytes)), token))
}

fn verify(session: &Session, cookie: Option<&str>, submitted: Option<&str>) -> Result<(), CsrfError> {
    let secret = csrf_secret(session).ok_or(CsrfError::NoSecret)?;
    let cookie = cookie.ok_or(CsrfError::Missing)?;
    let submitted = submitted.ok_or(CsrfError::Missing)?;
    verify_csrf_token(&secret, cookie, submitted)
}

#[async_trait]
impl Interceptor for CsrfProtect {
    fn name(&self) -> &'static str {
        "csrf_protect"
    }

    async fn intercept(&self, req: Request, next: Next) -> Response {
        let Some(session) = req.extensions().get::<Session>().cloned() else {
            return AppError::server("CSRF check requires a loaded session").into_response();
        };
        let cookie = SessionManager::cookie_value(req.headers(), &self.config.csrf_cookie_name);

        let mut req = if is_state_changing(req.method()) {
            let (req, submitted) = match submitted_token(req).await {
                Ok(found) => found,
                Err(e) => return e.into_response(),
            };
            if let Err(e) = verify(&session, cookie.as_deref(), submitted.as_deref()) {
                tracing::warn!("Rejected {} {}: {}", req.method(), req.uri().path(), e);
                return AppError::ClientError(StatusCode::BAD_REQUEST).into_response();
            }
            req
        } else {
            req
        };

        let (cookie, new_cookie) = match cookie {
            Some(cookie) => (cookie, false),
            None => match new_csrf_cookie_value() {
                Ok(cookie) => (cookie, true),
                Err(e) => return AppError::server(e).into_response(),
            },
        };
        let token = match ensure_csrf_secret(&session)
            .and_then(|secret| issue_csrf_token(&secret, &cookie))
        {
            Ok(token) => token,
            Err(e) => return AppError::server(e).into_response(),
        };
        req.extensions_mut().insert(token);

        let mut response = next.run(req).await;

        if new_cookie {
            let mut headers = HeaderMap::new();
            let max_age = i64::try_from(self.config.csrf_cookie_max_age).unwrap_or(i64::MAX);
            if let Err(e) = header_set_cookie(
                &mut headers,
                &self.config.csrf_cookie_name,
                &cookie,
                max_age,
                self.config.cookie_attributes,
            ) {
                return AppError::server(e).into_response();
            }
            for value in headers.get_all(SET_COOKIE) {
                response.headers_mut().append(SET_COOKIE, value.clone());
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_changing_methods() {
        assert!(is_state_changing(&Method::POST));
        assert!(is_state_changing(&Method::PUT));
        assert!(is_state_changing(&Method::PATCH));
        assert!(is_state_changing(&Method::DELETE));
        assert!(!is_state_changing(&Method::GET));
        assert!(!is_state_changing(&Method::HEAD));
        assert!(!is_state_changing(&Method::OPTIONS));
    }

    #[test]
    fn test_form_token_lookup() {
        let body = Bytes::from_static(b"title=Hi&csrf_token=abc%2Dxyz&content=there");
        assert_eq!(form_token(&body).as_deref(), Some("abc-xyz"));
        assert_eq!(form_token(&Bytes::from_static(b"title=Hi")), None);
    }

    #[test]
    fn test_form_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_form(&headers));
        headers.insert(
            CONTENT_TYPE,
            "application/x-www-form-urlencoded; charset=utf-8".parse().unwrap(),
        );
        assert!(is_form(&headers));
    }
}
