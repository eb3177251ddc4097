//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Bearer token required on `/v1` routes. None disables the check.
    pub api_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `STUDIO_API_ADDR` | Server bind address | `127.0.0.1:8787` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:studio.db?mode=rwc` |
    /// | `STUDIO_API_TOKEN` | Bearer token for clients | (none) |
    ///
    /// Provider credentials (`OPENROUTER_API_KEY`, `NVIDIA_API_KEY`, ...) are
    /// read by the provider crates.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("STUDIO_API_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8787".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:studio.db?mode=rwc".to_string());

        let api_token = env::var("STUDIO_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        Ok(Self {
            addr,
            database_url,
            api_token,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid STUDIO_API_ADDR format")]
    InvalidAddr,
}
