//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, password hashing, tokens) are implemented by
//! outbound adapters. Driving ports (commands and queries) are implemented by
//! domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod article_repository;
mod articles_command;
mod articles_query;
mod auth_command;
mod mood_entry_repository;
mod mood_tracker_command;
mod mood_tracker_query;
mod password_hasher;
mod token_service;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{ArticleCounter, ArticlePersistenceError, ArticleRepository};
pub use articles_command::ArticlesCommand;
pub use articles_query::ArticlesQuery;
pub use auth_command::{AuthCommand, AuthSession};
#[cfg(test)]
pub use mood_entry_repository::MockMoodEntryRepository;
pub use mood_entry_repository::{MoodEntryPersistenceError, MoodEntryRepository};
pub use mood_tracker_command::{MoodTrackerCommand, NewMoodEntry};
pub use mood_tracker_query::{MoodStatsReport, MoodTrackerQuery};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
pub use users_command::{UserChanges, UsersCommand};
pub use users_query::UsersQuery;
