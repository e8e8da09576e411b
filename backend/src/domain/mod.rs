//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities used by the API and persistence
//! layers, plus the services that implement the driving ports. Keep types
//! immutable where possible and document invariants and serialisation
//! contracts in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and its stable identifier.
//! - User and its value types; registration and login inputs.
//! - Article, ArticleDraft, ArticleFilter.
//! - Mood, MoodEntry, the spiral heuristic and per-mood stats.
//! - Services: AuthService, UserService, ArticleService, MoodTrackerService.

pub mod article;
pub mod article_service;
pub mod auth;
pub mod auth_service;
pub mod error;
pub mod mood;
pub mod mood_service;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::article::{
    Article, ArticleBody, ArticleDraft, ArticleFilter, ArticleId, ArticleInput, ArticleKind,
    ArticleStatus, ArticleValidationError,
};
pub use self::article_service::ArticleService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, PlainPassword, RegistrationDetails,
    RegistrationError, RegistrationRequest,
};
pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::mood::{
    CauseTooLong, DEFAULT_HISTORY_LIMIT, DEFAULT_SPIRAL_WINDOW, DEFAULT_STATS_DAYS,
    MAX_HISTORY_LIMIT, MAX_SPIRAL_WINDOW, MAX_STATS_DAYS, MOOD_CAUSE_MAX, Mood, MoodCause,
    MoodEnergy, MoodEntry, MoodEntryId, MoodSpiral, MoodStat, MoodTone, SpiralDirection,
    SpiralStrength, UnknownMood, detect_spiral, detect_spiral_from_tones, mood_stats,
};
pub use self::mood_service::MoodTrackerService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Age, EmailAddress, PasswordHash, PersonName, ProfileChanges, Role, User, UserId, UserProfile,
    UserValidationError, Username,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use mindspace::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
