//! Account and profile HTTP handlers.
//!
//! ```text
//! GET    /api/user/profile
//! PUT    /api/user/profile {"gender":"female","age":29}
//! GET    /api/users
//! GET    /api/users/{id}
//! PATCH  /api/users/{id} {"first_name":"Ada"}
//! DELETE /api/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UserChanges;
use crate::domain::{
    Age, EmailAddress, Error, PersonName, PlainPassword, ProfileChanges, Role, User, UserId,
    UserProfile, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_uuid, user_validation_error,
};

/// Optional personal details as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub age: Option<u8>,
    pub location: Option<String>,
    pub is_phone_verified: bool,
}

impl From<UserProfile> for ProfileResponse {
    fn from(value: UserProfile) -> Self {
        Self {
            gender: value.gender,
            phone_number: value.phone_number,
            age: value.age.map(Age::get),
            location: value.location,
            is_phone_verified: value.is_phone_verified,
        }
    }
}

/// Public view of an account. Never carries the password hash.
///
/// `isAdmin` mirrors the staff flag, which is set for psychologists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub profile: ProfileResponse,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let is_admin = value.is_staff();
        Self {
            id: value.id.to_string(),
            username: value.username.into(),
            email: value.email.into(),
            first_name: value.first_name.into(),
            last_name: value.last_name.into(),
            role: value.role.as_str().to_owned(),
            is_admin,
            profile: value.profile.into(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Profile fields accepted by `PUT /api/user/profile`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ProfileRequest {
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub age: Option<i64>,
    pub location: Option<String>,
}

impl TryFrom<ProfileRequest> for ProfileChanges {
    type Error = Error;

    fn try_from(value: ProfileRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            gender: value.gender,
            phone_number: value.phone_number,
            age: value
                .age
                .map(Age::new)
                .transpose()
                .map_err(user_validation_error)?,
            location: value.location,
        })
    }
}

/// Account fields accepted by `PATCH /api/users/{id}`. Absent fields are
/// left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UserPatchRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    #[serde(flatten)]
    pub profile: ProfileRequest,
}

const PASSWORD: FieldName = FieldName::new("password");
const USER_ID: FieldName = FieldName::new("id");

impl TryFrom<UserPatchRequest> for UserChanges {
    type Error = Error;

    fn try_from(value: UserPatchRequest) -> Result<Self, Self::Error> {
        let password = value
            .password
            .as_deref()
            .map(PlainPassword::new)
            .transpose()
            .map_err(|err| invalid_value_error(PASSWORD, err.to_string()))?;
        Ok(Self {
            username: value
                .username
                .map(Username::new)
                .transpose()
                .map_err(user_validation_error)?,
            email: value
                .email
                .map(EmailAddress::new)
                .transpose()
                .map_err(user_validation_error)?,
            first_name: value
                .first_name
                .map(|raw| PersonName::new("first_name", raw))
                .transpose()
                .map_err(user_validation_error)?,
            last_name: value
                .last_name
                .map(|raw| PersonName::new("last_name", raw))
                .transpose()
                .map_err(user_validation_error)?,
            password,
            role: value
                .role
                .map(|raw| raw.parse::<Role>())
                .transpose()
                .map_err(user_validation_error)?,
            profile: ProfileChanges::try_from(value.profile)?,
        })
    }
}

/// Envelope for profile updates.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub profile: ProfileResponse,
}

/// Envelope for messages without a payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn user_id(raw: &str) -> Result<UserId, Error> {
    parse_uuid(raw, USER_ID).map(UserId::from_uuid)
}

/// The caller's own account.
#[utoipa::path(
    get,
    path = "/api/user/profile",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getProfile",
    security(("bearer" = []))
)]
#[get("/user/profile")]
pub async fn get_profile(caller: AuthenticatedUser) -> ApiResult<web::Json<UserResponse>> {
    Ok(web::Json(caller.into_inner().into()))
}

/// Update the caller's optional personal details.
#[utoipa::path(
    put,
    path = "/api/user/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileUpdatedResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile",
    security(("bearer" = []))
)]
#[put("/user/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<ProfileUpdatedResponse>> {
    let changes = ProfileChanges::try_from(payload.into_inner())?;
    let user = state
        .users_command
        .update_profile(caller.user(), changes)
        .await?;
    Ok(web::Json(ProfileUpdatedResponse {
        message: "Profile updated successfully".to_owned(),
        profile: user.profile.into(),
    }))
}

/// Every account.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("bearer" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.list_users(caller.user()).await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// One account by id.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("bearer" = []))
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = user_id(&path)?;
    let user = state.users.get_user(caller.user(), &id).await?;
    Ok(web::Json(user.into()))
}

/// Patch an account. Callers may patch themselves; admins may patch anyone
/// and are the only ones allowed to change roles.
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UserPatchRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security(("bearer" = []))
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UserPatchRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = user_id(&path)?;
    let changes = UserChanges::try_from(payload.into_inner())?;
    let user = state
        .users_command
        .update_user(caller.user(), &id, changes)
        .await?;
    Ok(web::Json(user.into()))
}

/// Remove an account.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser",
    security(("bearer" = []))
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = user_id(&path)?;
    state.users_command.delete_user(caller.user(), &id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User deleted successfully".to_owned(),
    }))
}
