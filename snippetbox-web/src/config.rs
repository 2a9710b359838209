use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SessionStoreKind {
    Memory,
    Redis,
}

/// Command-line flags, each with an environment fallback
#[derive(Debug, Parser)]
#[command(name = "snippetbox")]
#[command(about = "Share short snippets of text", long_about = None)]
pub(crate) struct Config {
    /// Address to listen on
    #[arg(long, env = "SNIPPETBOX_ADDR", default_value = "0.0.0.0:4000")]
    pub(crate) addr: SocketAddr,

    /// Directory served under /static
    #[arg(long, env = "SNIPPETBOX_STATIC_DIR", default_value = "./ui/static")]
    pub(crate) static_dir: PathBuf,

    /// SQLite connection string
    #[arg(long, env = "SNIPPETBOX_DSN", default_value = "sqlite:snippetbox.db?mode=rwc")]
    pub(crate) dsn: String,

    #[arg(long, env = "SNIPPETBOX_TLS_CERT", default_value = "./tls/cert.pem")]
    pub(crate) tls_cert: PathBuf,

    #[arg(long, env = "SNIPPETBOX_TLS_KEY", default_value = "./tls/key.pem")]
    pub(crate) tls_key: PathBuf,

    /// Where sessions are kept
    #[arg(long, env = "SNIPPETBOX_SESSION_STORE", value_enum, default_value_t = SessionStoreKind::Memory)]
    pub(crate) session_store: SessionStoreKind,

    #[arg(long, env = "SNIPPETBOX_REDIS_URL")]
    pub(crate) redis_url: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum ConfigError {
    #[error("--redis-url is required when --session-store=redis")]
    MissingRedisUrl,

    #[error("TLS file not found: {0}")]
    MissingTlsFile(PathBuf),

    #[error("Static directory not found: {0}")]
    MissingStaticDir(PathBuf),
}

impl Config {
    /// Reject combinations that could only fail later, after the server has started.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.session_store == SessionStoreKind::Redis && self.redis_url.is_none() {
            return Err(ConfigError::MissingRedisUrl);
        }
        for file in [&self.tls_cert, &self.tls_key] {
            if !file.is_file() {
                return Err(ConfigError::MissingTlsFile(file.clone()));
            }
        }
        if !self.static_dir.is_dir() {
            return Err(ConfigError::MissingStaticDir(self.static_dir.clone()));
        }
        Ok(())
    }
}
