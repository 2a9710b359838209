use thiserror::Error;

#[derive(Clone, Error, Debug, PartialEq)]
pub enum ModelError {
    #[error("no matching record found")]
    NoRecord,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("duplicate email")]
    DuplicateEmail,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for ModelError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ModelError::NoRecord,
            other => ModelError::Storage(other.to_string()),
        }
    }
}
