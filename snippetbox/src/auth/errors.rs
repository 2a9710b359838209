use thiserror::Error;

use crate::models::ModelError;
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Model error: {0}")]
    Model(ModelError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl From<ModelError> for AuthError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidCredentials => AuthError::InvalidCredentials,
            other => AuthError::Model(other),
        }
    }
}
