//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Age, EmailAddress, PasswordHash, PersonName, Role, User, UserId, UserProfile, Username,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, violated_unique_constraint};
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: super::pool::PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    if let Some(constraint) = violated_unique_constraint(&error) {
        let field = if constraint.contains("username") {
            "username"
        } else if constraint.contains("email") {
            "email"
        } else {
            return UserPersistenceError::query("unique constraint violated");
        };
        return UserPersistenceError::duplicate(field);
    }
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn corrupt(row_id: uuid::Uuid, column: &str, err: impl std::fmt::Display) -> UserPersistenceError {
    warn!(user_id = %row_id, column, error = %err, "stored user row failed validation");
    UserPersistenceError::query(format!("stored user {column} is invalid"))
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let id = row.id;
    let age = row
        .age
        .map(|age| Age::new(i64::from(age)))
        .transpose()
        .map_err(|err| corrupt(id, "age", err))?;
    Ok(User {
        id: UserId::from_uuid(id),
        username: Username::new(&row.username).map_err(|err| corrupt(id, "username", err))?,
        email: EmailAddress::new(&row.email).map_err(|err| corrupt(id, "email", err))?,
        first_name: PersonName::new("first_name", &row.first_name)
            .map_err(|err| corrupt(id, "first_name", err))?,
        last_name: PersonName::new("last_name", &row.last_name)
            .map_err(|err| corrupt(id, "last_name", err))?,
        password_hash: PasswordHash::new(row.password_hash),
        role: row
            .role
            .parse::<Role>()
            .map_err(|err| corrupt(id, "role", err))?,
        profile: UserProfile {
            gender: row.gender,
            phone_number: row.phone_number,
            age,
            location: row.location,
            is_phone_verified: row.is_phone_verified,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn user_to_row(user: &User) -> UserRow {
    UserRow {
        id: *user.id.as_uuid(),
        username: user.username.as_ref().to_owned(),
        email: user.email.as_ref().to_owned(),
        first_name: user.first_name.as_ref().to_owned(),
        last_name: user.last_name.as_ref().to_owned(),
        password_hash: user.password_hash.as_str().to_owned(),
        role: user.role.as_str().to_owned(),
        gender: user.profile.gender.clone(),
        phone_number: user.profile.phone_number.clone(),
        age: user.profile.age.map(|age| i16::from(age.get())),
        location: user.profile.location.clone(),
        is_phone_verified: user.profile.is_phone_verified,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

type UserPredicate = Box<dyn BoxableExpression<users::table, Pg, SqlType = Bool>>;

impl DieselUserRepository {
    async fn first_matching(
        &self,
        predicate: UserPredicate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .into_boxed()
            .filter(predicate)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(users::table)
            .values(&user_to_row(user))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let affected = diesel::update(users::table.find(*user.id.as_uuid()))
            .set(&user_to_row(user))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(affected > 0)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.first_matching(Box::new(users::id.eq(*id.as_uuid())))
            .await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.first_matching(Box::new(users::email.eq(email.as_ref().to_owned())))
            .await
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.first_matching(Box::new(users::username.eq(username.as_ref().to_owned())))
            .await
    }

    async fn find_by_login(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let email = identifier.trim().to_lowercase();
        let username = identifier.trim().to_owned();
        self.first_matching(Box::new(
            users::email.eq(email).or(users::username.eq(username)),
        ))
        .await
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::created_at.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let affected = diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(affected > 0)
    }
}
