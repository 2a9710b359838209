use std::backtrace::Backtrace;

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use snippetbox::{AuthError, ModelError, SessionError};

use crate::templates::TemplateError;

/// Failure of a request, as seen by the client.
///
/// Not-found and client errors carry only a status; server errors keep their
/// detail for the log and answer with a generic body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Client error: {0}")]
    ClientError(StatusCode),

    #[error("Server error: {0}")]
    Server(String),
}

impl AppError {
    pub fn server(err: impl std::fmt::Display) -> Self {
        AppError::Server(err.to_string())
    }
}

fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::ClientError(status) => status,
            AppError::Server(detail) => {
                let trace = Backtrace::capture();
                tracing::error!("{}\n{}", detail, trace);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, status_text(status)).into_response()
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NoRecord => AppError::NotFound,
            other => AppError::server(other),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::server(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::server(err)
    }
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        AppError::server(err)
    }
}
