//! Application settings loaded via OrthoConfig.
//!
//! Layers, lowest precedence first: defaults, an optional config file,
//! `MINDSPACE_*` environment variables, then command-line flags.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_TOKEN_TTL_DAYS: u32 = 30;
const MAX_TOKEN_TTL_DAYS: u32 = 3_650;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Signing key used by debug builds when none is configured.
const DEV_JWT_SECRET: &str = "mindspace-development-secret";

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MINDSPACE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; absent means in-process stores.
    pub database_url: Option<String>,
    /// HS256 signing key for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Bearer token lifetime in days.
    pub token_ttl_days: Option<u32>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Apply pending migrations at startup.
    pub run_migrations: Option<bool>,
}

/// Why settings could not be turned into a running configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    #[error("MINDSPACE_JWT_SECRET must be set in release builds")]
    MissingJwtSecret,
    #[error("token lifetime must be between 1 and {max} days, got {days}")]
    TokenTtl { days: u32, max: u32 },
}

impl AppSettings {
    /// Return the configured listen address, falling back to the default.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Return the configured signing key.
    ///
    /// Debug builds fall back to a fixed development key; the second value
    /// reports whether that happened so the caller can warn.
    pub fn jwt_secret(&self) -> Result<(String, bool), SettingsError> {
        match self.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => Ok((secret.to_owned(), false)),
            None if cfg!(debug_assertions) => Ok((DEV_JWT_SECRET.to_owned(), true)),
            None => Err(SettingsError::MissingJwtSecret),
        }
    }

    /// Return the token lifetime in days, falling back to the default.
    pub fn token_ttl_days(&self) -> Result<u32, SettingsError> {
        match self.token_ttl_days.unwrap_or(DEFAULT_TOKEN_TTL_DAYS) {
            days @ 1..=MAX_TOKEN_TTL_DAYS => Ok(days),
            days => Err(SettingsError::TokenTtl {
                days,
                max: MAX_TOKEN_TTL_DAYS,
            }),
        }
    }

    /// Return the pool size, falling back to the default.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    /// Whether to migrate at startup; defaults to `true`.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}
