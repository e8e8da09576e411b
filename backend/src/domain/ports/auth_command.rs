//! Driving port for registration, login and bearer-token resolution.
//!
//! Inbound adapters call this port without knowing which hasher, token
//! format or user store backs it.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, RegistrationRequest, User};

/// Token plus the user it was issued for.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Domain use-case port for authentication.
#[async_trait]
pub trait AuthCommand: Send + Sync {
    /// Validate and create an account, then issue a token for it.
    async fn register(&self, request: RegistrationRequest) -> Result<AuthSession, Error>;

    /// Check credentials and issue a fresh token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Resolve a bearer token to the user it belongs to.
    async fn authenticate(&self, token: &str) -> Result<User, Error>;
}
