//! Mood tracker use-cases: recording, history, stats and the spiral.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::info;

use crate::domain::mood::{MAX_HISTORY_LIMIT, MAX_SPIRAL_WINDOW, MAX_STATS_DAYS};
use crate::domain::ports::{
    MoodEntryPersistenceError, MoodEntryRepository, MoodStatsReport, MoodTrackerCommand,
    MoodTrackerQuery, NewMoodEntry,
};
use crate::domain::{Error, MoodEntry, MoodEntryId, MoodSpiral, UserId, detect_spiral, mood_stats};

/// Mood tracker service implementing the mood driving ports.
#[derive(Clone)]
pub struct MoodTrackerService<M> {
    entries: Arc<M>,
}

impl<M> MoodTrackerService<M> {
    /// Create a new service over the given repository.
    pub fn new(entries: Arc<M>) -> Self {
        Self { entries }
    }
}

fn map_entry_error(error: MoodEntryPersistenceError) -> Error {
    match error {
        MoodEntryPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("mood repository unavailable: {message}"))
        }
        MoodEntryPersistenceError::Query { message } => {
            Error::internal(format!("mood repository error: {message}"))
        }
    }
}

fn out_of_range(field: &str, max: u32, value: u32) -> Error {
    Error::invalid_request(format!("{field} must be between 1 and {max}")).with_details(json!({
        "field": field,
        "code": "out_of_range",
        "value": value,
    }))
}

#[async_trait]
impl<M: MoodEntryRepository> MoodTrackerCommand for MoodTrackerService<M> {
    async fn record_mood(
        &self,
        user_id: &UserId,
        entry: NewMoodEntry,
    ) -> Result<MoodEntry, Error> {
        let now = Utc::now();
        let entry = MoodEntry {
            id: MoodEntryId::random(),
            user_id: *user_id,
            mood: entry.mood,
            cause: entry.cause,
            timestamp: entry.timestamp.unwrap_or(now),
            created_at: now,
        };
        self.entries.insert(&entry).await.map_err(map_entry_error)?;
        info!(
            user_id = %user_id,
            entry_id = %entry.id,
            mood = %entry.mood,
            tone = entry.tone().as_str(),
            "mood recorded"
        );
        Ok(entry)
    }

    async fn delete_mood_entry(&self, user_id: &UserId, id: &MoodEntryId) -> Result<(), Error> {
        let deleted = self
            .entries
            .delete(user_id, id)
            .await
            .map_err(map_entry_error)?;
        if !deleted {
            return Err(Error::not_found("Mood entry not found"));
        }
        info!(user_id = %user_id, entry_id = %id, "mood entry deleted");
        Ok(())
    }
}

#[async_trait]
impl<M: MoodEntryRepository> MoodTrackerQuery for MoodTrackerService<M> {
    async fn history(&self, user_id: &UserId, limit: u32) -> Result<Vec<MoodEntry>, Error> {
        self.entries
            .recent(user_id, limit.clamp(1, MAX_HISTORY_LIMIT))
            .await
            .map_err(map_entry_error)
    }

    async fn stats(&self, user_id: &UserId, days: u32) -> Result<MoodStatsReport, Error> {
        if !(1..=MAX_STATS_DAYS).contains(&days) {
            return Err(out_of_range("days", MAX_STATS_DAYS, days));
        }
        let since = Utc::now() - Duration::days(i64::from(days));
        let entries = self
            .entries
            .since(user_id, since)
            .await
            .map_err(map_entry_error)?;
        Ok(MoodStatsReport {
            days,
            since,
            total_entries: u32::try_from(entries.len()).unwrap_or(u32::MAX),
            stats: mood_stats(&entries),
        })
    }

    async fn spiral(&self, user_id: &UserId, window: u32) -> Result<MoodSpiral, Error> {
        if !(1..=MAX_SPIRAL_WINDOW).contains(&window) {
            return Err(out_of_range("limit", MAX_SPIRAL_WINDOW, window));
        }
        let recent = self
            .entries
            .recent(user_id, window)
            .await
            .map_err(map_entry_error)?;
        Ok(detect_spiral(&recent, window))
    }
}
