//! Registration, login and token resolution.
//!
//! `AuthService` implements [`AuthCommand`] over a user repository, a
//! password hasher and a token service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    AuthCommand, AuthSession, PasswordHashError, PasswordHasher, TokenError, TokenService,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, RegistrationDetails, RegistrationError, RegistrationRequest, User,
    UserId, UserProfile, Username,
};

/// Upper bound on `base1`, `base2`, … probes before giving up.
const USERNAME_ATTEMPTS: u32 = 1_000;
/// Inserts retried when a concurrent registration claims the derived username.
const USERNAME_CLAIM_ATTEMPTS: u32 = 3;

pub(crate) const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub(crate) const TOKEN_FAILED: &str = "Not authorized, token failed";
pub(crate) const USER_NOT_FOUND: &str = "User not found";
pub(crate) const EMAIL_TAKEN: &str = "Email already exists";

/// Authentication service implementing the driving port.
#[derive(Clone)]
pub struct AuthService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> AuthService<U, H, T> {
    /// Create a new service with the given adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => duplicate_field_error(&field),
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("password hasher failed: {error}"))
}

pub(crate) fn duplicate_field_error(field: &str) -> Error {
    if field == "email" {
        Error::invalid_request(EMAIL_TAKEN).with_details(json!({
            "field": "email",
            "code": "email_taken",
        }))
    } else {
        Error::invalid_request(format!("{field} already exists")).with_details(json!({
            "field": field,
            "code": format!("{field}_taken"),
        }))
    }
}

fn registration_error(error: RegistrationError) -> Error {
    let message = error.to_string();
    match error {
        RegistrationError::MissingFields { missing } => Error::invalid_request(message)
            .with_details(json!({ "code": "missing_fields", "missing": missing })),
        RegistrationError::PasswordTooShort { min } => {
            Error::invalid_request(message).with_details(json!({
                "field": "password",
                "code": "password_too_short",
                "min": min,
            }))
        }
        RegistrationError::Invalid(err) => Error::invalid_request(message).with_details(json!({
            "field": err.field(),
            "code": err.code(),
        })),
    }
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Signing { message } => {
            Error::internal(format!("token signing failed: {message}"))
        }
        TokenError::Invalid { .. } | TokenError::Expired => Error::unauthorized(TOKEN_FAILED),
    }
}

impl<U, H, T> AuthService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn free_username(&self, base: &str) -> Result<Username, Error> {
        for attempt in 0..USERNAME_ATTEMPTS {
            let candidate = Username::candidate(base, attempt)
                .map_err(|err| Error::internal(format!("derived username invalid: {err}")))?;
            let taken = self
                .users
                .find_by_username(&candidate)
                .await
                .map_err(map_user_persistence_error)?;
            if taken.is_none() {
                return Ok(candidate);
            }
            debug!(username = %candidate, "username taken, trying next suffix");
        }
        Err(Error::conflict(format!("no free username derived from {base}")))
    }

    fn session_for(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(&user.id).map_err(map_token_error)?;
        Ok(AuthSession { token, user })
    }
}

#[async_trait]
impl<U, H, T> AuthCommand for AuthService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn register(&self, request: RegistrationRequest) -> Result<AuthSession, Error> {
        let details = RegistrationDetails::try_from(request).map_err(registration_error)?;

        if self
            .users
            .find_by_email(&details.email)
            .await
            .map_err(map_user_persistence_error)?
            .is_some()
        {
            return Err(duplicate_field_error("email"));
        }

        let base = Username::base_from_email(&details.email);
        let password_hash = self
            .hasher
            .hash(&details.password)
            .map_err(map_hash_error)?;

        let mut profile = UserProfile::default();
        profile.apply(details.profile);
        let now = Utc::now();
        let mut user = User {
            id: UserId::random(),
            username: self.free_username(&base).await?,
            email: details.email,
            first_name: details.first_name,
            last_name: details.last_name,
            password_hash,
            role: details.role,
            profile,
            created_at: now,
            updated_at: now,
        };

        let mut claims = 1;
        loop {
            match self.users.insert(&user).await {
                Ok(()) => break,
                Err(UserPersistenceError::Duplicate { field })
                    if field == "username" && claims < USERNAME_CLAIM_ATTEMPTS =>
                {
                    debug!(username = %user.username, "derived username claimed concurrently");
                    claims += 1;
                    user.username = self.free_username(&base).await?;
                }
                Err(err) => return Err(map_user_persistence_error(err)),
            }
        }
        info!(user_id = %user.id, username = %user.username, role = %user.role, "user registered");
        self.session_for(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let Some(user) = self
            .users
            .find_by_login(credentials.identifier())
            .await
            .map_err(map_user_persistence_error)?
        else {
            debug!("login rejected: unknown identifier");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .map_err(map_hash_error)?;
        if !matches {
            debug!(user_id = %user.id, "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = %user.id, "user logged in");
        self.session_for(user)
    }

    async fn authenticate(&self, token: &str) -> Result<User, Error> {
        let user_id = self.tokens.verify(token).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            map_token_error(err)
        })?;
        self.users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::unauthorized(USER_NOT_FOUND))
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
