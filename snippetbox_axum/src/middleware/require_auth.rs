use async_trait::async_trait;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use http::{
    Method,
    header::{CACHE_CONTROL, HeaderValue},
};

use snippetbox::{Principal, REDIRECT_AFTER_LOGIN_KEY, Session};

use crate::error::AppError;
use crate::pipeline::Interceptor;

pub const LOGIN_PATH: &str = "/user/login";

/// Send anonymous visitors to the login page; keep authenticated pages out of caches.
pub struct RequireAuthentication;

#[async_trait]
impl Interceptor for RequireAuthentication {
    fn name(&self) -> &'static str {
        "require_authentication"
    }

    async fn intercept(&self, req: Request, next: Next) -> Response {
        let principal = req
            .extensions()
            .get::<Principal>()
            .copied()
            .unwrap_or_default();

        if !principal.is_authenticated() {
            if req.method() == Method::GET {
                if let Some(session) = req.extensions().get::<Session>() {
                    let target = req
                        .uri()
                        .path_and_query()
                        .map(|pq| pq.as_str().to_string())
                        .unwrap_or_else(|| req.uri().path().to_string());
                    if let Err(e) = session.insert(REDIRECT_AFTER_LOGIN_KEY, target) {
                        return AppError::from(e).into_response();
                    }
                }
            }
            tracing::debug!("Anonymous request to {} redirected to login", req.uri().path());
            return Redirect::to(LOGIN_PATH).into_response();
        }

        let mut response = next.run(req).await;
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        response
    }
}
