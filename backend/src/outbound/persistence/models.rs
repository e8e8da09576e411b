//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{articles, mood_entries, users};

/// Full `users` row, used for reads, inserts and whole-record updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: String,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub age: Option<i16>,
    pub location: Option<String>,
    pub is_phone_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full `articles` row, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ArticleRow {
    pub id: Uuid,
    pub title: String,
    pub article_type: String,
    pub content: Option<String>,
    pub external_url: Option<String>,
    pub external_source: Option<String>,
    pub original_author: Option<String>,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub reading_time: i32,
    pub status: String,
    pub is_verified: bool,
    pub views: i64,
    pub clicks: i64,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author-editable `articles` columns.
///
/// Counters, verification and authorship are absent so an edit never
/// overwrites them.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ArticleChangeset {
    pub title: String,
    pub article_type: String,
    pub content: Option<String>,
    pub external_url: Option<String>,
    pub external_source: Option<String>,
    pub original_author: Option<String>,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub reading_time: i32,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading and inserting mood entries.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = mood_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MoodEntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood: String,
    pub cause: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
