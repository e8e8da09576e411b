//! Driving port for reading mood history and its derived views.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Error, MoodEntry, MoodSpiral, MoodStat, UserId};

/// Per-mood counts over a trailing window of days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodStatsReport {
    pub days: u32,
    pub since: DateTime<Utc>,
    pub total_entries: u32,
    pub stats: Vec<MoodStat>,
}

/// Domain use-case port for mood history reads.
#[async_trait]
pub trait MoodTrackerQuery: Send + Sync {
    /// The newest `limit` entries, newest first.
    async fn history(&self, user_id: &UserId, limit: u32) -> Result<Vec<MoodEntry>, Error>;

    /// Counts per mood over the last `days` days.
    async fn stats(&self, user_id: &UserId, days: u32) -> Result<MoodStatsReport, Error>;

    /// Spiral classification over the newest `window` entries.
    async fn spiral(&self, user_id: &UserId, window: u32) -> Result<MoodSpiral, Error>;
}
