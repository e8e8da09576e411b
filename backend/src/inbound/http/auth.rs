//! Registration, login and token introspection handlers.
//!
//! ```text
//! POST /api/auth/register {"email":"ada@example.com","first_name":"Ada","last_name":"Byron","password":"…"}
//! POST /api/auth/login    {"email":"ada","password":"…"}
//! GET  /api/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AuthSession;
use crate::domain::{Error, LoginCredentials, LoginValidationError, RegistrationRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;

/// Body for `POST /api/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    /// `user` or `psychologist`; anything else registers a `user`.
    pub role: Option<String>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub age: Option<i64>,
    pub location: Option<String>,
}

impl From<RegisterRequest> for RegistrationRequest {
    fn from(value: RegisterRequest) -> Self {
        Self {
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            password: value.password,
            role: value.role,
            gender: value.gender,
            phone_number: value.phone_number,
            age: value.age,
            location: value.location,
        }
    }
}

/// Body for `POST /api/auth/login`. `email` also accepts a username.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.email.as_deref().unwrap_or_default(),
            value.password.as_deref().unwrap_or_default(),
        )
    }
}

/// Token plus the account it was issued for.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

impl SessionResponse {
    fn new(message: &str, session: AuthSession) -> Self {
        Self {
            message: message.to_owned(),
            token: session.token,
            user: session.user.into(),
        }
    }
}

/// Envelope for `GET /api/auth/me`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub user: UserResponse,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::MissingFields => Error::invalid_request(err.to_string())
            .with_details(serde_json::json!({ "code": "missing_fields" })),
    }
}

/// Create an account and sign the caller in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = SessionResponse),
        (status = 400, description = "Invalid or duplicate registration", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let session = state.auth.register(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(SessionResponse::new("User registered successfully", session)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse),
        (status = 400, description = "Missing credentials", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let session = state.auth.login(&credentials).await?;
    Ok(web::Json(SessionResponse::new("Login successful", session)))
}

/// The account behind the presented token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Missing, invalid or orphaned token", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "me",
    security(("bearer" = []))
)]
#[get("/auth/me")]
pub async fn me(caller: AuthenticatedUser) -> ApiResult<web::Json<MeResponse>> {
    Ok(web::Json(MeResponse {
        user: caller.into_inner().into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::{bearer, test_app};
    use crate::test_support::Harness;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn registration(email: &str) -> Value {
        json!({
            "email": email,
            "first_name": "Ada",
            "last_name": "Byron",
            "password": "analytical engine",
        })
    }

    #[actix_web::test]
    async fn register_login_and_me() {
        let harness = Harness::new();
        let app = actix_test::init_service(test_app(harness.state.clone())).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(registration("Ada@Example.com"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "User registered successfully");
        assert_eq!(body["user"]["email"], "ada@example.com");
        assert_eq!(body["user"]["username"], "ada");
        assert_eq!(body["user"]["role"], "user");
        assert_eq!(body["user"]["isAdmin"], false);
        assert!(body["user"].get("password_hash").is_none());

        let req = actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "ada", "password": "analytical engine"}))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Login successful");
        let token = body["token"].as_str().expect("token").to_owned();

        let req = actix_test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user"]["username"], "ada");
    }

    #[actix_web::test]
    async fn duplicate_email_is_a_bad_request() {
        let app = actix_test::init_service(test_app(Harness::new().state)).await;
        for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
            let req = actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(registration("ada@example.com"))
                .to_request();
            let res = actix_test::call_service(&app, req).await;
            assert_eq!(res.status(), expected);
            if expected == StatusCode::BAD_REQUEST {
                let body: Value = actix_test::read_body_json(res).await;
                assert_eq!(body["details"]["code"], "email_taken");
            }
        }
    }

    #[actix_web::test]
    async fn missing_registration_fields_are_listed() {
        let app = actix_test::init_service(test_app(Harness::new().state)).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"email": "ada@example.com"}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body["details"]["missing"],
            json!(["first_name", "last_name", "password"])
        );
    }

    #[rstest]
    #[case::missing_password(json!({"email": "ada"}), StatusCode::BAD_REQUEST)]
    #[case::blank_identifier(json!({"email": "  ", "password": "x"}), StatusCode::BAD_REQUEST)]
    #[case::unknown_user(json!({"email": "nobody", "password": "analytical engine"}), StatusCode::UNAUTHORIZED)]
    #[case::wrong_password(json!({"email": "ada@example.com", "password": "difference engine"}), StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn login_failures(#[case] body: Value, #[case] status: StatusCode) {
        let app = actix_test::init_service(test_app(Harness::new().state)).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(registration("ada@example.com"))
            .to_request();
        assert!(actix_test::call_service(&app, req).await.status().is_success());

        let req = actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(body)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), status);
        let payload: Value = actix_test::read_body_json(res).await;
        let expected = if status == StatusCode::UNAUTHORIZED {
            "Invalid credentials"
        } else {
            "Please provide email and password"
        };
        assert_eq!(payload["message"], expected);
    }

    #[test]
    fn missing_login_fields_map_to_invalid_request() {
        let err = map_login_validation_error(LoginValidationError::MissingFields);
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Please provide email and password");
    }
}
