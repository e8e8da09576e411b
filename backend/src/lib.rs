//! Mindspace backend library: accounts, wellness articles and a mood tracker
//! behind an Actix-web REST API.
//!
//! - [`domain`]: validated types, services and ports
//! - [`inbound`]: HTTP handlers and request mapping
//! - [`outbound`]: PostgreSQL, in-memory and credential adapters
//! - [`middleware`]: request tracing

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
