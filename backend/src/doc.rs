//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every handler in the inbound HTTP layer, including the
//!   health probes
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]
//!   and the mood report schemas) that provide OpenAPI definitions without
//!   coupling domain types to the utoipa framework. Handler DTOs are
//!   collected from the paths that reference them.
//! - **Security**: HTTP bearer (JWT) authentication scheme
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, MoodSpiralSchema, MoodStatSchema, MoodStatsReportSchema,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token issued by POST /api/auth/register or POST /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Mindspace API",
        description = "Accounts, wellness articles and a personal mood tracker."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearer" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::me,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::articles::list_articles,
        crate::inbound::http::articles::get_article,
        crate::inbound::http::articles::create_article,
        crate::inbound::http::articles::update_article,
        crate::inbound::http::articles::delete_article,
        crate::inbound::http::articles::verify_article,
        crate::inbound::http::articles::record_click,
        crate::inbound::http::mood_tracker::record_mood,
        crate::inbound::http::mood_tracker::history,
        crate::inbound::http::mood_tracker::stats,
        crate::inbound::http::mood_tracker::spiral,
        crate::inbound::http::mood_tracker::delete_entry,
        crate::inbound::http::health::summary,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MoodStatSchema,
        MoodStatsReportSchema,
        MoodSpiralSchema
    )),
    tags(
        (name = "auth", description = "Registration, login and the current account"),
        (name = "users", description = "Profiles and account administration"),
        (name = "articles", description = "Wellness articles and external resources"),
        (name = "mood-tracker", description = "Personal mood history, statistics and trends"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
