//! Route table and the interceptor stack of each route group

use std::path::Path;

use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::handlers;
use crate::middleware::{
    Authenticate, CsrfProtect, LoadAndSaveSession, LogRequest, RecoverPanic,
    RequireAuthentication, SecureHeaders,
};
use crate::pipeline::Pipeline;
use crate::state::AppState;

/// Applied to every request, matched or not
pub fn standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with(RecoverPanic)
        .with(LogRequest)
        .with(SecureHeaders)
}

/// Session-aware pages
pub fn dynamic_pipeline(state: &AppState) -> Pipeline {
    Pipeline::new()
        .with(LoadAndSaveSession::new(state.sessions.clone()))
        .with(CsrfProtect::new(state.sessions.config().clone()))
        .with(Authenticate::new(state.users.clone()))
}

/// Pages that require a logged-in user
pub fn protected_pipeline(state: &AppState) -> Pipeline {
    dynamic_pipeline(state).with(RequireAuthentication)
}

/// Build the complete application router.
///
/// Group stacks wrap each endpoint's methods rather than the whole group, so
/// unknown paths reach the fallback and wrong methods get a 405 with `Allow`
/// without loading a session.
pub fn app_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let dynamic = dynamic_pipeline(&state);
    let protected = protected_pipeline(&state);
    let static_files =
        ServeDir::new(static_dir.as_ref()).not_found_service(handlers::not_found.into_service());

    let routes = Router::new()
        .route("/ping", get(handlers::ping))
        .nest_service("/static", static_files)
        .route("/", dynamic.wrap_methods(get(handlers::home)))
        .route(
            "/snippet/view/{id}",
            dynamic.wrap_methods(get(handlers::snippet_view)),
        )
        .route(
            "/user/signup",
            dynamic.wrap_methods(get(handlers::user_signup).post(handlers::user_signup_post)),
        )
        .route(
            "/user/login",
            dynamic.wrap_methods(get(handlers::user_login).post(handlers::user_login_post)),
        )
        .route(
            "/snippet/create",
            protected.wrap_methods(
                get(handlers::snippet_create).post(handlers::snippet_create_post),
            ),
        )
        .route(
            "/user/logout",
            protected.wrap_methods(post(handlers::user_logout_post)),
        )
        .fallback(handlers::not_found);

    standard_pipeline().wrap(routes).with_state(state)
}
