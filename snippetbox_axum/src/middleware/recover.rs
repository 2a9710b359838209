use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;
use http::{
    StatusCode,
    header::{CONNECTION, HeaderValue},
};

use super::secure_headers::apply_secure_headers;
use crate::pipeline::Interceptor;

/// Turn a panic anywhere downstream into a 500 and close the connection.
pub struct RecoverPanic;

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[async_trait]
impl Interceptor for RecoverPanic {
    fn name(&self) -> &'static str {
        "recover_panic"
    }

    async fn intercept(&self, req: Request, next: Next) -> Response {
        let method = req.method().clone();
        let uri = req.uri().clone();

        match AssertUnwindSafe(next.run(req)).catch_unwind().await {
            Ok(response) => response,
            Err(payload) => {
                tracing::error!(
                    "Panic while handling {} {}: {}\n{}",
                    method,
                    uri,
                    panic_message(payload.as_ref()),
                    Backtrace::capture()
                );

                // Inner layers never saw this response
                let mut response =
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
                response
                    .headers_mut()
                    .insert(CONNECTION, HeaderValue::from_static("close"));
                apply_secure_headers(response.headers_mut());
                response
            }
        }
    }
}
