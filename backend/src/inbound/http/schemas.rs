//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration. Request and response DTOs
//! owned by the handlers derive `ToSchema` directly and are not repeated here.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A dependency such as the database is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Please enter a valid email")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level context such as `{field, code}` for validation failures.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::MoodStat`].
#[derive(ToSchema)]
#[schema(as = crate::domain::MoodStat)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MoodStatSchema {
    #[schema(example = "Anxious")]
    mood: String,
    count: u32,
    #[schema(example = "negative")]
    tone: String,
    #[schema(example = "high")]
    energy: String,
}

/// OpenAPI schema for [`crate::domain::ports::MoodStatsReport`].
#[derive(ToSchema)]
#[schema(as = crate::domain::MoodStatsReport)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MoodStatsReportSchema {
    days: u32,
    /// Start of the window (RFC 3339).
    since: String,
    #[schema(rename = "totalEntries")]
    total_entries: u32,
    /// Most frequent first; ties by label.
    stats: Vec<MoodStatSchema>,
}

/// OpenAPI schema for [`crate::domain::MoodSpiral`].
#[derive(ToSchema)]
#[schema(as = crate::domain::MoodSpiral)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MoodSpiralSchema {
    /// `insufficient_data`, `upward`, `downward` or `mixed`.
    #[schema(example = "downward")]
    spiral: String,
    /// `strong`, `moderate` or `neutral`; absent for `insufficient_data`.
    #[schema(example = "moderate")]
    strength: Option<String>,
    positive_count: u32,
    negative_count: u32,
    /// Number of newest entries considered.
    window: u32,
}
