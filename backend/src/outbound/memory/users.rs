use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserId, Username};

/// User store enforcing the same uniqueness rules as the SQL schema.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

/// First unique column `candidate` collides on, ignoring its own record.
fn conflicting_field(users: &HashMap<UserId, User>, candidate: &User) -> Option<&'static str> {
    users
        .values()
        .filter(|existing| existing.id != candidate.id)
        .find_map(|existing| {
            if existing.email == candidate.email {
                Some("email")
            } else if existing.username == candidate.username {
                Some("username")
            } else {
                None
            }
        })
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(UserPersistenceError::query("duplicate primary key"));
        }
        if let Some(field) = conflicting_field(&users, user) {
            return Err(UserPersistenceError::duplicate(field));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Ok(false);
        }
        if let Some(field) = conflicting_field(&users, user) {
            return Err(UserPersistenceError::duplicate(field));
        }
        users.insert(user.id, user.clone());
        Ok(true)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| &user.email == email).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| &user.username == username).cloned())
    }

    async fn find_by_login(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let identifier = identifier.trim();
        let email = identifier.to_lowercase();
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.email.as_ref() == email || user.username.as_ref() == identifier)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|user| user.created_at);
        Ok(users)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.users.write().await.remove(id).is_some())
    }
}
