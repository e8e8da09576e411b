//! Test helpers for inbound HTTP components.

use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::{App, web};

use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;

/// Build the full API application over `state`, wrapped in the trace
/// middleware and with the same extractor and fallback configuration as
/// the server.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(super::configure)
}

/// `Authorization: Bearer <token>` header pair.
pub fn bearer(token: &str) -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}
