use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::{Router, http::StatusCode};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use hyper_util::rt::TokioTimer;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Deadline for the request line and headers; also bounds idle keep-alive waits.
const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(5);
const BODY_READ_TIMEOUT: Duration = Duration::from_secs(5);
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub(crate) fn init_tracing(app_name: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        {
            format!("snippetbox_axum=debug,snippetbox=debug,{app_name}=debug,info").into()
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = app_name;
            "info".into()
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Per-request deadlines applied outside the application router
pub(crate) fn with_timeouts(app: Router) -> Router {
    app.layer(RequestBodyTimeoutLayer::new(BODY_READ_TIMEOUT))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            RESPONSE_TIMEOUT,
        ))
}

pub(crate) async fn serve_https(
    addr: SocketAddr,
    cert: &Path,
    key: &Path,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let tls = RustlsConfig::from_pem_file(cert, key).await?;

    let handle = Handle::new();
    tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

    let mut server = axum_server::bind_rustls(addr, tls).handle(handle);
    server
        .http_builder()
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(HEADER_READ_TIMEOUT);

    tracing::info!("Starting server on https://{}", addr);
    server
        .serve(
            with_timeouts(app).into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_on_ctrl_c(handle: Handle) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::Request, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        with_timeouts(
            Router::new()
                .route("/fast", get(|| async { "done" }))
                .route(
                    "/slow",
                    get(|| async {
                        tokio::time::sleep(RESPONSE_TIMEOUT * 2).await;
                        "too late"
                    }),
                ),
        )
    }

    fn get_req(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_handler_times_out() {
        let response = app().oneshot(get_req("/slow")).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_handler_is_untouched() {
        let response = app().oneshot(get_req("/fast")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
