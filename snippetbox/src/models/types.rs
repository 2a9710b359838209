use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::human_date;

/// Identifier of a user account, as stored in the session under `authenticatedUserID`.
pub type UserId = i64;

/// A short piece of text with a fixed lifetime
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

impl Snippet {
    pub fn created_display(&self) -> String {
        human_date(&self.created)
    }

    pub fn expires_display(&self) -> String {
        human_date(&self.expires)
    }
}
