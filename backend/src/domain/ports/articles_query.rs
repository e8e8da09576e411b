//! Driving port for public article reads.

use async_trait::async_trait;

use crate::domain::{Article, ArticleFilter, ArticleId, Error};

/// Domain use-case port for browsing articles.
#[async_trait]
pub trait ArticlesQuery: Send + Sync {
    /// Articles matching `filter`, newest first.
    async fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>, Error>;

    /// Fetch an article and count the view.
    async fn view_article(&self, id: &ArticleId) -> Result<Article, Error>;
}
