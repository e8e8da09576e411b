//! Port abstraction for article persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Article, ArticleDraft, ArticleFilter, ArticleId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by article repository adapters.
    pub enum ArticlePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "article repository query failed: {message}",
    }
}

/// Counter columns that can be bumped atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleCounter {
    Views,
    Clicks,
}

/// Driven port for article storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert a new article.
    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError>;

    /// Overwrite the editable fields of an article and return the stored
    /// result, or `None` when the id is unknown.
    ///
    /// Counters, verification and authorship are left as stored.
    async fn update(
        &self,
        id: &ArticleId,
        draft: &ArticleDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Article>, ArticlePersistenceError>;

    /// Set the verified flag, leaving every other column as stored.
    async fn mark_verified(
        &self,
        id: &ArticleId,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Article>, ArticlePersistenceError>;

    /// Fetch an article by identifier.
    async fn find_by_id(&self, id: &ArticleId)
    -> Result<Option<Article>, ArticlePersistenceError>;

    /// List articles matching `filter`, newest first.
    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>, ArticlePersistenceError>;

    /// Delete an article. Returns `false` when the id is unknown.
    async fn delete(&self, id: &ArticleId) -> Result<bool, ArticlePersistenceError>;

    /// Atomically add one to a counter and return the updated article.
    async fn increment(
        &self,
        id: &ArticleId,
        counter: ArticleCounter,
    ) -> Result<Option<Article>, ArticlePersistenceError>;
}
