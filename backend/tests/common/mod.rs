//! Shared helpers for HTTP flow tests over in-memory adapters.

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use serde_json::Value;

use mindspace::Trace;
use mindspace::inbound::http::state::HttpState;

/// The full `/api` surface over `state`, wrapped in the trace middleware.
pub async fn init_app(
    state: HttpState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .configure(mindspace::inbound::http::configure),
    )
    .await
}

/// Status and decoded JSON body of one call.
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

/// Send `method uri` with an optional bearer token and JSON body.
pub async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    method: actix_web::http::Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut req = actix_test::TestRequest::default().method(method).uri(uri);
    if let Some(token) = token {
        req = req.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    if let Some(body) = body {
        req = req.set_json(body);
    }
    let res = actix_test::call_service(app, req.to_request()).await;
    let status = res.status();
    let bytes = actix_test::read_body(res).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply { status, body }
}
