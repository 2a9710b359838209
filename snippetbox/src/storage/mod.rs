//! SQLite-backed implementations of the repository traits

mod snippets;
mod users;

pub use snippets::SqliteSnippetRepository;
pub use users::SqliteUserRepository;

use sqlx::{Pool, Sqlite, sqlite::SqlitePoolOptions};

use crate::models::ModelError;

/// Open a connection pool for the given SQLite URL, e.g. `sqlite:snippetbox.db?mode=rwc`.
pub async fn connect_sqlite(url: &str) -> Result<Pool<Sqlite>, ModelError> {
    // In-memory databases are private to a connection
    let max_connections = if url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;

    tracing::info!("Connected to SQLite database: {}", url);
    Ok(pool)
}
