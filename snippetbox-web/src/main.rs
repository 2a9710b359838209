use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use snippetbox::{
    MemorySessionStore, RedisSessionStore, SessionConfig, SessionManager, SessionStore,
    SqliteSnippetRepository, SqliteUserRepository, connect_sqlite,
};
use snippetbox_axum::{AppState, TemplateCache, app_router};

mod config;
mod server;

use crate::config::{Config, SessionStoreKind};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Both ring and aws-lc-rs may be linked; pick one for the whole process
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "Failed to install default CryptoProvider")?;

    dotenvy::dotenv().ok();
    server::init_tracing(env!("CARGO_CRATE_NAME"));

    let config = Config::parse();
    config.validate()?;

    let pool = connect_sqlite(&config.dsn).await?;
    let snippets = SqliteSnippetRepository::new(pool.clone()).await?;
    let users = SqliteUserRepository::new(pool).await?;

    let store = session_store(&config).await?;
    let templates = TemplateCache::new()?;

    let state = AppState {
        snippets: Arc::new(snippets),
        users: Arc::new(users),
        templates: Arc::new(templates),
        sessions: SessionManager::new(store, SessionConfig::default()),
    };

    let app = app_router(state, &config.static_dir);
    server::serve_https(config.addr, &config.tls_cert, &config.tls_key, app).await
}

async fn session_store(config: &Config) -> Result<Arc<dyn SessionStore>, Box<dyn std::error::Error>> {
    let store: Arc<dyn SessionStore> = match (config.session_store, config.redis_url.as_deref()) {
        (SessionStoreKind::Redis, Some(url)) => Arc::new(RedisSessionStore::new(url)?),
        (SessionStoreKind::Redis, None) => return Err("Redis session store needs a URL".into()),
        (SessionStoreKind::Memory, _) => {
            let memory = Arc::new(MemorySessionStore::new());
            spawn_purge_task(memory.clone());
            memory
        }
    };
    store.init().await?;
    Ok(store)
}

fn spawn_purge_task(store: Arc<MemorySessionStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = store.purge_expired();
            if purged > 0 {
                tracing::debug!("Purged {} expired sessions", purged);
            }
        }
    });
}
