//! Interceptors making up the standard and route-group pipelines.
//!
//! Standard stack, applied to every request: [`RecoverPanic`], [`LogRequest`],
//! [`SecureHeaders`]. Dynamic routes add [`LoadAndSaveSession`], [`CsrfProtect`]
//! and [`Authenticate`]; protected routes add [`RequireAuthentication`] on top.

mod authenticate;
mod csrf;
mod log_request;
mod recover;
mod require_auth;
mod secure_headers;
mod session;

pub use authenticate::Authenticate;
pub use csrf::CsrfProtect;
pub use log_request::LogRequest;
pub use recover::RecoverPanic;
pub use require_auth::{LOGIN_PATH, RequireAuthentication};
pub use secure_headers::{SecureHeaders, apply_secure_headers};
pub use session::LoadAndSaveSession;
