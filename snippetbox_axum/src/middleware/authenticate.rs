use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use snippetbox::{Session, UserRepository, resolve_principal};

use crate::error::AppError;
use crate::pipeline::Interceptor;

/// Attach the request's [`snippetbox::Principal`] for handlers and later interceptors.
pub struct Authenticate {
    users: Arc<dyn UserRepository>,
}

impl Authenticate {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Interceptor for Authenticate {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    async fn intercept(&self, mut req: Request, next: Next) -> Response {
        let Some(session) = req.extensions().get::<Session>().cloned() else {
            return AppError::server("Authentication requires a loaded session").into_response();
        };

        match resolve_principal(&session, self.users.as_ref()).await {
            Ok(principal) => {
                tracing::trace!("Principal: {:?}", principal);
                req.extensions_mut().insert(principal);
                next.run(req).await
            }
            Err(e) => AppError::from(e).into_response(),
        }
    }
}
