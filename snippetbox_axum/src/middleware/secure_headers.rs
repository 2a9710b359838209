use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response};
use http::header::{
    CONTENT_SECURITY_POLICY, HeaderMap, HeaderValue, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS, X_XSS_PROTECTION,
};

use crate::pipeline::Interceptor;

const CSP: &str = "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com";

/// Set the fixed browser-hardening headers.
pub fn apply_secure_headers(headers: &mut HeaderMap) {
    headers.insert(CONTENT_SECURITY_POLICY, HeaderValue::from_static(CSP));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("origin-when-cross-origin"),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("deny"));
    headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("0"));
}

pub struct SecureHeaders;

#[async_trait]
impl Interceptor for SecureHeaders {
    fn name(&self) -> &'static str {
        "secure_headers"
    }

    async fn intercept(&self, req: Request, next: Next) -> Response {
        let mut response = next.run(req).await;
        apply_secure_headers(response.headers_mut());
        response
    }
}
