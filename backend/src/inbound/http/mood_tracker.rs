//! Mood tracker handlers. Every route acts on the caller's own history.
//!
//! ```text
//! POST   /api/mood-tracker {"mood":"Anxious","cause":"deadline","timestamp":"2026-03-01T08:30:00Z"}
//! GET    /api/mood-tracker?limit=50
//! GET    /api/mood-tracker/stats?days=30
//! GET    /api/mood-tracker/spiral?limit=5
//! DELETE /api/mood-tracker/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{MoodStatsReport, NewMoodEntry};
use crate::domain::{
    DEFAULT_HISTORY_LIMIT, DEFAULT_SPIRAL_WINDOW, DEFAULT_STATS_DAYS, Error, Mood, MoodCause,
    MoodEntry, MoodEntryId, MoodSpiral,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthenticatedUser;
use crate::inbound::http::schemas::{ErrorSchema, MoodSpiralSchema, MoodStatsReportSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponse;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, missing_field_error, parse_timestamp, parse_uuid,
};

const MOOD: FieldName = FieldName::new("mood");
const CAUSE: FieldName = FieldName::new("cause");
const TIMESTAMP: FieldName = FieldName::new("timestamp");
const ENTRY_ID: FieldName = FieldName::new("id");

/// Body for `POST /api/mood-tracker`. `reason` is accepted as an alias of
/// `cause`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct MoodEntryRequest {
    #[schema(example = "Calm")]
    pub mood: Option<String>,
    #[serde(alias = "reason")]
    pub cause: Option<String>,
    /// RFC 3339; defaults to the time of the request.
    pub timestamp: Option<String>,
}

impl TryFrom<MoodEntryRequest> for NewMoodEntry {
    type Error = Error;

    fn try_from(value: MoodEntryRequest) -> Result<Self, Self::Error> {
        let raw_mood = value
            .mood
            .filter(|raw| !raw.trim().is_empty())
            .ok_or_else(|| missing_field_error(MOOD))?;
        let mood = raw_mood
            .parse::<Mood>()
            .map_err(|err| invalid_value_error(MOOD, err.to_string()))?;
        let cause = value
            .cause
            .as_deref()
            .map(MoodCause::parse)
            .transpose()
            .map_err(|err| invalid_value_error(CAUSE, err.to_string()))?
            .flatten();
        let timestamp = value
            .timestamp
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_timestamp(raw, TIMESTAMP))
            .transpose()?;
        Ok(Self {
            mood,
            cause,
            timestamp,
        })
    }
}

/// A recorded entry with its derived tone and energy.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MoodEntryResponse {
    pub id: String,
    pub user_id: String,
    #[schema(example = "Calm")]
    pub mood: String,
    #[schema(example = "positive")]
    pub mood_tone: String,
    #[schema(example = "low")]
    pub mood_energy: String,
    pub cause: Option<String>,
    pub timestamp: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<MoodEntry> for MoodEntryResponse {
    fn from(value: MoodEntry) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.user_id.to_string(),
            mood: value.mood.label().to_owned(),
            mood_tone: value.tone().as_str().to_owned(),
            mood_energy: value.energy().as_str().to_owned(),
            cause: value.cause.map(String::from),
            timestamp: value.timestamp.to_rfc3339(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// `?limit=` for history and spiral.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery {
    pub limit: Option<u32>,
}

/// `?days=` for stats.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DaysQuery {
    pub days: Option<u32>,
}

/// Record a mood for the caller.
#[utoipa::path(
    post,
    path = "/api/mood-tracker",
    request_body = MoodEntryRequest,
    responses(
        (status = 201, description = "Entry recorded", body = MoodEntryResponse),
        (status = 400, description = "Unknown mood, cause too long or bad timestamp", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["mood-tracker"],
    operation_id = "recordMood",
    security(("bearer" = []))
)]
#[post("/mood-tracker")]
pub async fn record_mood(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<MoodEntryRequest>,
) -> ApiResult<HttpResponse> {
    let entry = NewMoodEntry::try_from(payload.into_inner())?;
    let recorded = state.mood.record_mood(&caller.user().id, entry).await?;
    Ok(HttpResponse::Created().json(MoodEntryResponse::from(recorded)))
}

/// The caller's newest entries, newest first.
#[utoipa::path(
    get,
    path = "/api/mood-tracker",
    params(LimitQuery),
    responses(
        (status = 200, description = "Mood history", body = [MoodEntryResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["mood-tracker"],
    operation_id = "moodHistory",
    security(("bearer" = []))
)]
#[get("/mood-tracker")]
pub async fn history(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<Vec<MoodEntryResponse>>> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let entries = state.mood_query.history(&caller.user().id, limit).await?;
    Ok(web::Json(
        entries.into_iter().map(MoodEntryResponse::from).collect(),
    ))
}

/// Per-mood counts over the trailing window.
#[utoipa::path(
    get,
    path = "/api/mood-tracker/stats",
    params(DaysQuery),
    responses(
        (status = 200, description = "Mood statistics", body = MoodStatsReportSchema),
        (status = 400, description = "Window out of range", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["mood-tracker"],
    operation_id = "moodStats",
    security(("bearer" = []))
)]
#[get("/mood-tracker/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    query: web::Query<DaysQuery>,
) -> ApiResult<web::Json<MoodStatsReport>> {
    let days = query.days.unwrap_or(DEFAULT_STATS_DAYS);
    let report = state.mood_query.stats(&caller.user().id, days).await?;
    Ok(web::Json(report))
}

/// Trend classification over the newest entries.
#[utoipa::path(
    get,
    path = "/api/mood-tracker/spiral",
    params(LimitQuery),
    responses(
        (status = 200, description = "Spiral classification", body = MoodSpiralSchema),
        (status = 400, description = "Window out of range", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["mood-tracker"],
    operation_id = "moodSpiral",
    security(("bearer" = []))
)]
#[get("/mood-tracker/spiral")]
pub async fn spiral(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<MoodSpiral>> {
    let window = query.limit.unwrap_or(DEFAULT_SPIRAL_WINDOW);
    let spiral = state.mood_query.spiral(&caller.user().id, window).await?;
    Ok(web::Json(spiral))
}

/// Delete one of the caller's entries.
#[utoipa::path(
    delete,
    path = "/api/mood-tracker/{id}",
    params(("id" = String, Path, description = "Entry id")),
    responses(
        (status = 200, description = "Entry deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Entry not found", body = ErrorSchema)
    ),
    tags = ["mood-tracker"],
    operation_id = "deleteMoodEntry",
    security(("bearer" = []))
)]
#[delete("/mood-tracker/{id}")]
pub async fn delete_entry(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_uuid(&path, ENTRY_ID).map(MoodEntryId::from_uuid)?;
    state.mood.delete_mood_entry(&caller.user().id, &id).await?;
    Ok(web::Json(MessageResponse {
        message: "Mood entry deleted successfully".to_owned(),
    }))
}

#[cfg(test)]
mod tests;
