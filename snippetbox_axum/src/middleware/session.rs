use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;
use http::header::{HeaderValue, VARY};

use snippetbox::{Session, SessionManager};

use crate::error::AppError;
use crate::pipeline::Interceptor;

/// Load the session before the handler and commit it afterwards, on every exit
/// path including a panic further in. After a panic the session is saved under
/// the token the client already holds.
pub struct LoadAndSaveSession {
    manager: SessionManager,
}

impl LoadAndSaveSession {
    pub fn new(manager: SessionManager) -> Self {
        Self { manager }
    }

    async fn commit_into(&self, session: &Session, response: &mut Response) -> Result<(), AppError> {
        let cookies = self.manager.commit(session).await?;
        let headers = response.headers_mut();
        for value in cookies.get_all(http::header::SET_COOKIE) {
            headers.append(http::header::SET_COOKIE, value.clone());
        }
        headers.append(VARY, HeaderValue::from_static("Cookie"));
        Ok(())
    }
}

#[async_trait]
impl Interceptor for LoadAndSaveSession {
    fn name(&self) -> &'static str {
        "load_and_save_session"
    }

    async fn intercept(&self, mut req: Request, next: Next) -> Response {
        let session = match self.manager.load(req.headers()).await {
            Ok(session) => session,
            Err(e) => return AppError::from(e).into_response(),
        };
        req.extensions_mut().insert(session.clone());

        match AssertUnwindSafe(next.run(req)).catch_unwind().await {
            Ok(mut response) => match self.commit_into(&session, &mut response).await {
                Ok(()) => response,
                Err(e) => e.into_response(),
            },
            Err(payload) => {
                // The panic response is built elsewhere and carries no cookie
                if let Err(e) = self.manager.commit_in_place(&session).await {
                    tracing::error!("Failed to save session after panic: {}", e);
                }
                std::panic::resume_unwind(payload)
            }
        }
    }
}
