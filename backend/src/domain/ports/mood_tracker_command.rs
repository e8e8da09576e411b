//! Driving port for writing mood history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, Mood, MoodCause, MoodEntry, MoodEntryId, UserId};

/// Validated input for a new entry. A missing timestamp means "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMoodEntry {
    pub mood: Mood,
    pub cause: Option<MoodCause>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Domain use-case port for recording and removing mood entries.
#[async_trait]
pub trait MoodTrackerCommand: Send + Sync {
    /// Record an entry for `user_id`.
    async fn record_mood(&self, user_id: &UserId, entry: NewMoodEntry)
    -> Result<MoodEntry, Error>;

    /// Delete one of the caller's entries. Entries owned by anyone else are
    /// reported as not found.
    async fn delete_mood_entry(&self, user_id: &UserId, id: &MoodEntryId) -> Result<(), Error>;
}
