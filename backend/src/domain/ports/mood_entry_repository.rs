//! Port abstraction for mood entry persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{MoodEntry, MoodEntryId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by mood entry repository adapters.
    pub enum MoodEntryPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "mood entry repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "mood entry repository query failed: {message}",
    }
}

/// Driven port for per-user mood history.
///
/// All reads are scoped to one owner; ordering is by `timestamp` descending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MoodEntryRepository: Send + Sync {
    /// Persist a new entry.
    async fn insert(&self, entry: &MoodEntry) -> Result<(), MoodEntryPersistenceError>;

    /// Newest `limit` entries for `user_id`.
    async fn recent(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<MoodEntry>, MoodEntryPersistenceError>;

    /// Entries for `user_id` with `timestamp >= since`.
    async fn since(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<MoodEntry>, MoodEntryPersistenceError>;

    /// Delete an entry owned by `user_id`. Returns `false` when no such entry
    /// exists for that owner.
    async fn delete(
        &self,
        user_id: &UserId,
        id: &MoodEntryId,
    ) -> Result<bool, MoodEntryPersistenceError>;
}
