//! Driven port for issuing and verifying bearer tokens.

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Failures raised by token adapters.
    pub enum TokenError {
        /// Signature, structure or claims were rejected.
        Invalid { message: String } => "token rejected: {message}",
        /// The token is past its expiry.
        Expired => "token expired",
        /// The adapter could not sign a new token.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Signed, expiring token bound to a single user id.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token for `user_id`.
    fn issue(&self, user_id: &UserId) -> Result<String, TokenError>;

    /// Verify `token` and return the user id it was issued for.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
