use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{MoodEntryPersistenceError, MoodEntryRepository};
use crate::domain::{MoodEntry, MoodEntryId, UserId};

/// Mood entry store scoped by owner on every read and delete.
#[derive(Default)]
pub struct InMemoryMoodEntryRepository {
    entries: RwLock<Vec<MoodEntry>>,
}

impl InMemoryMoodEntryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(entries: &mut [MoodEntry]) {
    entries.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

#[async_trait]
impl MoodEntryRepository for InMemoryMoodEntryRepository {
    async fn insert(&self, entry: &MoodEntry) -> Result<(), MoodEntryPersistenceError> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn recent(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<MoodEntry>, MoodEntryPersistenceError> {
        let mut owned: Vec<MoodEntry> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|entry| &entry.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut owned);
        owned.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(owned)
    }

    async fn since(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<MoodEntry>, MoodEntryPersistenceError> {
        let mut owned: Vec<MoodEntry> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|entry| &entry.user_id == user_id && entry.timestamp >= since)
            .cloned()
            .collect();
        newest_first(&mut owned);
        Ok(owned)
    }

    async fn delete(
        &self,
        user_id: &UserId,
        id: &MoodEntryId,
    ) -> Result<bool, MoodEntryPersistenceError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|entry| !(&entry.id == id && &entry.user_id == user_id));
        Ok(entries.len() < before)
    }
}
