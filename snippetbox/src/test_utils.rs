//! Test doubles shared by the unit tests of this crate

use async_trait::async_trait;

use crate::models::{ModelError, UserId, UserRepository};

pub const VALID_EMAIL: &str = "lilstar@bg3.com";
pub const VALID_PASSWORD: &str = "cazadorsucks";
pub const DUPE_EMAIL: &str = "dupe@email.com";

/// User repository with one fixed account (id 1)
#[derive(Default)]
pub struct MockUserRepository {
    fail: bool,
}

impl MockUserRepository {
    /// A repository whose every call fails with a storage error
    pub fn failing() -> Self {
        Self { fail: true }
    }

    fn check(&self) -> Result<(), ModelError> {
        if self.fail {
            Err(ModelError::Storage("database unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn insert(&self, _name: &str, email: &str, _password: &str) -> Result<(), ModelError> {
        self.check()?;
        if email == DUPE_EMAIL {
            return Err(ModelError::DuplicateEmail);
        }
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<UserId, ModelError> {
        self.check()?;
        if email == VALID_EMAIL && password == VALID_PASSWORD {
            Ok(1)
        } else {
            Err(ModelError::InvalidCredentials)
        }
    }

    async fn exists(&self, id: UserId) -> Result<bool, ModelError> {
        self.check()?;
        Ok(id == 1)
    }
}
