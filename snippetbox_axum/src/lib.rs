//! snippetbox-axum - HTTP layer of snippetbox
//!
//! Requests pass through an ordered [`Pipeline`] of [`Interceptor`]s: a standard
//! stack on every request plus a session-aware or login-protected stack per route
//! group. Pages are rendered from a [`TemplateCache`] built once at startup.

mod context;
mod error;
mod forms;
mod handlers;
mod middleware;
mod pipeline;
mod router;
mod state;
mod templates;

#[cfg(test)]
mod test_utils;

pub use context::{FLASH_KEY, PageContext};
pub use error::AppError;
pub use middleware::{
    Authenticate, CsrfProtect, LOGIN_PATH, LoadAndSaveSession, LogRequest, RecoverPanic,
    RequireAuthentication, SecureHeaders, apply_secure_headers,
};
pub use pipeline::{Interceptor, Pipeline};
pub use router::{app_router, dynamic_pipeline, protected_pipeline, standard_pipeline};
pub use state::AppState;
pub use templates::{FormState, PAGES, PageRenderer, TemplateCache, TemplateData, TemplateError};
