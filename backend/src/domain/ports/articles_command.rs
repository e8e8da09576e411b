//! Driving port for the article content-management use-cases.

use async_trait::async_trait;

use crate::domain::{Article, ArticleDraft, ArticleId, Error, User};

/// Domain use-case port for authoring and moderating articles.
#[async_trait]
pub trait ArticlesCommand: Send + Sync {
    /// Publish a new article authored by `actor`.
    async fn create_article(&self, actor: &User, draft: ArticleDraft) -> Result<Article, Error>;

    /// Replace the editable fields of an article.
    async fn update_article(
        &self,
        actor: &User,
        id: &ArticleId,
        draft: ArticleDraft,
    ) -> Result<Article, Error>;

    /// Remove an article. Admin only.
    async fn delete_article(&self, actor: &User, id: &ArticleId) -> Result<(), Error>;

    /// Mark an article as verified. Admin only.
    async fn verify_article(&self, actor: &User, id: &ArticleId) -> Result<Article, Error>;

    /// Count an outbound click. Public.
    async fn record_click(&self, id: &ArticleId) -> Result<Article, Error>;
}
