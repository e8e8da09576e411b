//! Driving port for user-facing reads.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading accounts.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every account visible to `actor`, oldest first.
    async fn list_users(&self, actor: &User) -> Result<Vec<User>, Error>;

    /// A single account by id.
    async fn get_user(&self, actor: &User, id: &UserId) -> Result<User, Error>;
}
