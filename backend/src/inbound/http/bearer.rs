//! Bearer-token extractor keeping handlers free of header parsing.
//!
//! Handlers that need a caller take [`AuthenticatedUser`]; the extractor
//! reads `Authorization: Bearer <token>` and resolves it through the
//! [`AuthCommand`](crate::domain::ports::AuthCommand) port in [`HttpState`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, User};
use crate::inbound::http::state::HttpState;

pub(crate) const NO_TOKEN: &str = "Not authorized, no token";

/// The user behind a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    /// Borrow the resolved user.
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Consume the wrapper.
    pub fn into_inner(self) -> User {
        self.0
    }
}

/// Token portion of an `Authorization` header, if it uses the Bearer scheme.
fn bearer_token(req: &HttpRequest) -> Option<String> {
    let raw = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = raw.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_owned())
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(token) = token else {
                debug!("request without bearer token");
                return Err(Error::unauthorized(NO_TOKEN));
            };
            let state =
                state.ok_or_else(|| Error::internal("HttpState missing from app data"))?;
            state.auth.authenticate(&token).await.map(AuthenticatedUser)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::AuthCommand;
    use crate::domain::{RegistrationRequest, User};
    use crate::test_support::in_memory_state;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;
    use serde_json::Value;

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.user().username.as_ref().to_owned())
    }

    async fn registered(state: &HttpState) -> (String, User) {
        let session = state
            .auth
            .register(RegistrationRequest {
                email: Some("noor@example.com".to_owned()),
                first_name: Some("Noor".to_owned()),
                last_name: Some("Haddad".to_owned()),
                password: Some("long enough".to_owned()),
                ..RegistrationRequest::default()
            })
            .await
            .expect("register");
        (session.token, session.user)
    }

    #[actix_web::test]
    async fn resolves_valid_tokens() {
        let state = in_memory_state();
        let (token, _) = registered(&state).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/", web::get().to(whoami)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "noor");
    }

    #[rstest]
    #[case::missing(None, NO_TOKEN)]
    #[case::wrong_scheme(Some("Basic Zm9vOmJhcg=="), NO_TOKEN)]
    #[case::empty_bearer(Some("Bearer "), NO_TOKEN)]
    #[case::garbage(Some("Bearer not.a.jwt"), "Not authorized, token failed")]
    #[actix_web::test]
    async fn rejects_missing_or_bad_tokens(
        #[case] header: Option<&'static str>,
        #[case] message: &str,
    ) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(in_memory_state()))
                .route("/", web::get().to(whoami)),
        )
        .await;
        let mut req = test::TestRequest::get().uri("/");
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], message);
    }
}
