//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column (`email` or `username`) already holds the value.
        Duplicate { field: String } => "user {field} already exists",
    }
}

/// Driven port for user storage.
///
/// Implementations must enforce uniqueness of `email` and `username` and
/// report violations as [`UserPersistenceError::Duplicate`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Replace an existing user record. Returns `false` when the id is unknown.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact (normalised) email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the user whose email (case-insensitive) or username equals
    /// `identifier`.
    async fn find_by_login(&self, identifier: &str)
    -> Result<Option<User>, UserPersistenceError>;

    /// List every user, oldest first.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Delete a user. Returns `false` when the id is unknown.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
