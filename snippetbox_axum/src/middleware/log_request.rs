use std::net::SocketAddr;

use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};

use crate::pipeline::Interceptor;

pub struct LogRequest;

#[async_trait]
impl Interceptor for LogRequest {
    fn name(&self) -> &'static str {
        "log_request"
    }

    async fn intercept(&self, req: Request, next: Next) -> Response {
        let remote = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        tracing::info!(
            ip = %remote,
            proto = ?req.version(),
            method = %req.method(),
            uri = %req.uri(),
            "received request"
        );

        next.run(req).await
    }
}
