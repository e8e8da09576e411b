//! PostgreSQL-backed `MoodEntryRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{MoodEntryPersistenceError, MoodEntryRepository};
use crate::domain::{Mood, MoodCause, MoodEntry, MoodEntryId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::MoodEntryRow;
use super::pool::{DbPool, PoolError};
use super::schema::mood_entries;

/// Diesel-backed implementation of the [`MoodEntryRepository`] port.
#[derive(Clone)]
pub struct DieselMoodEntryRepository {
    pool: DbPool,
}

impl DieselMoodEntryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> MoodEntryPersistenceError {
    map_pool_error(error, MoodEntryPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> MoodEntryPersistenceError {
    map_diesel_error(
        error,
        MoodEntryPersistenceError::query,
        MoodEntryPersistenceError::connection,
    )
}

fn row_to_entry(row: MoodEntryRow) -> Result<MoodEntry, MoodEntryPersistenceError> {
    let mood = row.mood.parse::<Mood>().map_err(|err| {
        warn!(entry_id = %row.id, error = %err, "stored mood entry has unknown mood");
        MoodEntryPersistenceError::query("stored mood is invalid")
    })?;
    let cause = match row.cause.as_deref() {
        Some(raw) => MoodCause::parse(raw).map_err(|err| {
            warn!(entry_id = %row.id, error = %err, "stored mood entry has oversized cause");
            MoodEntryPersistenceError::query("stored cause is invalid")
        })?,
        None => None,
    };
    Ok(MoodEntry {
        id: MoodEntryId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        mood,
        cause,
        timestamp: row.recorded_at,
        created_at: row.created_at,
    })
}

fn entry_to_row(entry: &MoodEntry) -> MoodEntryRow {
    MoodEntryRow {
        id: *entry.id.as_uuid(),
        user_id: *entry.user_id.as_uuid(),
        mood: entry.mood.label().to_owned(),
        cause: entry.cause.as_ref().map(|cause| cause.as_ref().to_owned()),
        recorded_at: entry.timestamp,
        created_at: entry.created_at,
    }
}

#[async_trait]
impl MoodEntryRepository for DieselMoodEntryRepository {
    async fn insert(&self, entry: &MoodEntry) -> Result<(), MoodEntryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(mood_entries::table)
            .values(&entry_to_row(entry))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn recent(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<MoodEntry>, MoodEntryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<MoodEntryRow> = mood_entries::table
            .filter(mood_entries::user_id.eq(*user_id.as_uuid()))
            .order((mood_entries::recorded_at.desc(), mood_entries::created_at.desc()))
            .limit(i64::from(limit))
            .select(MoodEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_entry).collect()
    }

    async fn since(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<MoodEntry>, MoodEntryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<MoodEntryRow> = mood_entries::table
            .filter(mood_entries::user_id.eq(*user_id.as_uuid()))
            .filter(mood_entries::recorded_at.ge(since))
            .order(mood_entries::recorded_at.desc())
            .select(MoodEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_entry).collect()
    }

    async fn delete(
        &self,
        user_id: &UserId,
        id: &MoodEntryId,
    ) -> Result<bool, MoodEntryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let affected = diesel::delete(
            mood_entries::table
                .filter(mood_entries::id.eq(*id.as_uuid()))
                .filter(mood_entries::user_id.eq(*user_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> MoodEntry {
        let now = Utc::now();
        MoodEntry {
            id: MoodEntryId::random(),
            user_id: UserId::random(),
            mood: Mood::Overwhelmed,
            cause: MoodCause::parse("exam week").expect("cause"),
            timestamp: now,
            created_at: now,
        }
    }

    #[rstest]
    fn rows_convert_back_to_entries() {
        let entry = sample();
        let restored = row_to_entry(entry_to_row(&entry)).expect("valid row");
        assert_eq!(restored, entry);
    }

    #[rstest]
    fn unknown_stored_mood_is_a_query_error() {
        let mut row = entry_to_row(&sample());
        row.mood = "Hangry".to_owned();
        assert!(matches!(
            row_to_entry(row),
            Err(MoodEntryPersistenceError::Query { .. })
        ));
    }
}
