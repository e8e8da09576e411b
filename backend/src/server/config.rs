//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use chrono::Duration;
use mindspace::outbound::persistence::DbPool;
use zeroize::Zeroizing;

const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: Zeroizing<Vec<u8>>,
    pub(crate) token_ttl: Duration,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration with the signing key for bearer
    /// tokens and no database.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            bind_addr,
            jwt_secret: Zeroizing::new(jwt_secret.into()),
            token_ttl: Duration::days(DEFAULT_TOKEN_TTL_DAYS),
            db_pool: None,
        }
    }

    /// Override how long issued tokens stay valid.
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one the server runs on in-process stores.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
