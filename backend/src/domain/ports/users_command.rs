//! Driving port for account and profile mutation.

use async_trait::async_trait;

use crate::domain::{
    EmailAddress, Error, PersonName, PlainPassword, ProfileChanges, Role, User, UserId, Username,
};

/// Validated partial update of an account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub password: Option<PlainPassword>,
    pub role: Option<Role>,
    pub profile: ProfileChanges,
}

/// Domain use-case port for account mutation.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Apply profile changes to the caller's own account.
    async fn update_profile(&self, actor: &User, changes: ProfileChanges) -> Result<User, Error>;

    /// Patch an account. Callers may patch themselves; admins may patch anyone.
    async fn update_user(
        &self,
        actor: &User,
        id: &UserId,
        changes: UserChanges,
    ) -> Result<User, Error>;

    /// Remove an account. Same ownership rule as [`UsersCommand::update_user`].
    async fn delete_user(&self, actor: &User, id: &UserId) -> Result<(), Error>;
}
