//! HTTP inbound adapter exposing REST endpoints.
//!
//! Everything except the health probes lives under `/api`:
//!
//! ```text
//! /api/auth/{register,login,me}
//! /api/user/profile
//! /api/users[/{id}]
//! /api/articles[/{id}[/verify|/click]]
//! /api/mood-tracker[/stats|/spiral|/{id}]
//! ```

pub mod articles;
pub mod auth;
pub mod bearer;
pub mod error;
pub mod health;
pub mod mood_tracker;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;
use error::{json_error_handler, query_error_handler, route_not_found};

/// Register the `/api` scope, the body and query error handlers, and the
/// JSON 404 fallback.
///
/// Callers provide `web::Data<HttpState>` themselves.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let api = web::scope("/api")
        .service(auth::register)
        .service(auth::login)
        .service(auth::me)
        .service(users::get_profile)
        .service(users::update_profile)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(articles::list_articles)
        .service(articles::create_article)
        .service(articles::get_article)
        .service(articles::update_article)
        .service(articles::delete_article)
        .service(articles::verify_article)
        .service(articles::record_click)
        // Literal segments before `{id}`.
        .service(mood_tracker::stats)
        .service(mood_tracker::spiral)
        .service(mood_tracker::record_mood)
        .service(mood_tracker::history)
        .service(mood_tracker::delete_entry);

    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(api)
        .default_service(web::to(route_not_found));
}
