//! In-process repositories backed by `tokio::sync::RwLock` maps.
//!
//! Used when no database is configured in debug builds, and by the HTTP and
//! integration tests. Data lives only as long as the process.

mod articles;
mod mood_entries;
mod users;

pub use articles::InMemoryArticleRepository;
pub use mood_entries::InMemoryMoodEntryRepository;
pub use users::InMemoryUserRepository;
