//! Account reads and mutations.
//!
//! `UserService` implements [`UsersQuery`] and [`UsersCommand`]. Accounts may
//! be modified by their owner or by an admin; only admins may change roles.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::domain::auth_service::{duplicate_field_error, map_hash_error, map_user_persistence_error};
use crate::domain::ports::{PasswordHasher, UserChanges, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{Error, ProfileChanges, User, UserId};

const USER_NOT_FOUND: &str = "User not found";

/// User service implementing the account driving ports.
#[derive(Clone)]
pub struct UserService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> UserService<U, H> {
    /// Create a new service with the given adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

fn ensure_may_modify(actor: &User, target: &UserId) -> Result<(), Error> {
    if actor.id == *target || actor.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden("Not authorized to modify this user"))
    }
}

impl<U, H> UserService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn store(&self, mut user: User) -> Result<User, Error> {
        user.updated_at = Utc::now();
        let found = self
            .users
            .update(&user)
            .await
            .map_err(map_user_persistence_error)?;
        if found {
            Ok(user)
        } else {
            Err(Error::not_found(USER_NOT_FOUND))
        }
    }

    /// Reject a new email or username already held by another account.
    async fn ensure_unique(&self, target: &User, changes: &UserChanges) -> Result<(), Error> {
        if let Some(email) = changes.email.as_ref().filter(|email| **email != target.email) {
            let holder = self
                .users
                .find_by_email(email)
                .await
                .map_err(map_user_persistence_error)?;
            if holder.is_some_and(|holder| holder.id != target.id) {
                return Err(duplicate_field_error("email"));
            }
        }
        if let Some(username) = changes
            .username
            .as_ref()
            .filter(|username| **username != target.username)
        {
            let holder = self
                .users
                .find_by_username(username)
                .await
                .map_err(map_user_persistence_error)?;
            if holder.is_some_and(|holder| holder.id != target.id) {
                return Err(duplicate_field_error("username"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<U, H> UsersQuery for UserService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn list_users(&self, _actor: &User) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_persistence_error)
    }

    async fn get_user(&self, _actor: &User, id: &UserId) -> Result<User, Error> {
        self.load(id).await
    }
}

#[async_trait]
impl<U, H> UsersCommand for UserService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn update_profile(&self, actor: &User, changes: ProfileChanges) -> Result<User, Error> {
        let mut user = self.load(&actor.id).await?;
        user.profile.apply(changes);
        let user = self.store(user).await?;
        info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    async fn update_user(
        &self,
        actor: &User,
        id: &UserId,
        changes: UserChanges,
    ) -> Result<User, Error> {
        let mut user = self.load(id).await?;
        ensure_may_modify(actor, id)?;
        if changes.role.is_some() && !actor.is_admin() {
            return Err(Error::forbidden("Only admins can change roles"));
        }
        self.ensure_unique(&user, &changes).await?;

        let UserChanges {
            username,
            email,
            first_name,
            last_name,
            password,
            role,
            profile,
        } = changes;
        if let Some(password) = password {
            user.password_hash = self.hasher.hash(&password).map_err(map_hash_error)?;
        }
        if let Some(username) = username {
            user.username = username;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(first_name) = first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            user.last_name = last_name;
        }
        if let Some(role) = role {
            user.role = role;
        }
        user.profile.apply(profile);

        let user = self.store(user).await?;
        info!(user_id = %user.id, actor_id = %actor.id, "user updated");
        Ok(user)
    }

    async fn delete_user(&self, actor: &User, id: &UserId) -> Result<(), Error> {
        self.load(id).await?;
        ensure_may_modify(actor, id)?;
        let deleted = self
            .users
            .delete(id)
            .await
            .map_err(map_user_persistence_error)?;
        if !deleted {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(user_id = %id, actor_id = %actor.id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
