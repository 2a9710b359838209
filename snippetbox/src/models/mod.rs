mod errors;
mod repository;
mod types;

pub use errors::ModelError;
pub use repository::{SnippetRepository, UserRepository};
pub use types::{Snippet, UserId};
