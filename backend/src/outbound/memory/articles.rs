use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{ArticleCounter, ArticlePersistenceError, ArticleRepository};
use crate::domain::{Article, ArticleDraft, ArticleFilter, ArticleId};

/// Article store; listing applies [`ArticleFilter::matches`].
#[derive(Default)]
pub struct InMemoryArticleRepository {
    articles: RwLock<HashMap<ArticleId, Article>>,
}

impl InMemoryArticleRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
        let mut articles = self.articles.write().await;
        if articles.contains_key(&article.id) {
            return Err(ArticlePersistenceError::query("duplicate primary key"));
        }
        articles.insert(article.id, article.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &ArticleId,
        draft: &ArticleDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut articles = self.articles.write().await;
        Ok(articles.get_mut(id).map(|stored| {
            stored.draft = draft.clone();
            stored.updated_at = updated_at;
            stored.clone()
        }))
    }

    async fn mark_verified(
        &self,
        id: &ArticleId,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut articles = self.articles.write().await;
        Ok(articles.get_mut(id).map(|stored| {
            stored.is_verified = true;
            stored.updated_at = updated_at;
            stored.clone()
        }))
    }

    async fn find_by_id(
        &self,
        id: &ArticleId,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        Ok(self.articles.read().await.get(id).cloned())
    }

    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>, ArticlePersistenceError> {
        let mut matching: Vec<Article> = self
            .articles
            .read()
            .await
            .values()
            .filter(|article| filter.matches(article))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn delete(&self, id: &ArticleId) -> Result<bool, ArticlePersistenceError> {
        Ok(self.articles.write().await.remove(id).is_some())
    }

    async fn increment(
        &self,
        id: &ArticleId,
        counter: ArticleCounter,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut articles = self.articles.write().await;
        Ok(articles.get_mut(id).map(|article| {
            match counter {
                ArticleCounter::Views => article.views += 1,
                ArticleCounter::Clicks => article.clicks += 1,
            }
            article.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArticleKind, UserId};
    use crate::test_support::fixtures;
    use chrono::Duration;

    #[tokio::test]
    async fn list_is_newest_first_and_filtered() {
        let repo = InMemoryArticleRepository::new();
        let author = UserId::random();
        let older = Article::new(
            fixtures::external_draft("Older"),
            author,
            Utc::now() - Duration::hours(1),
        );
        let newer = Article::new(fixtures::internal_draft("Newer"), author, Utc::now());
        repo.insert(&older).await.expect("insert");
        repo.insert(&newer).await.expect("insert");

        let all = repo.list(&ArticleFilter::default()).await.expect("list");
        let titles: Vec<_> = all.iter().map(|a| a.draft.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);

        let external = repo
            .list(&ArticleFilter {
                kind: Some(ArticleKind::External),
                ..ArticleFilter::default()
            })
            .await
            .expect("list");
        assert_eq!(external.len(), 1);
        assert_eq!(external[0].id, older.id);
    }

    #[tokio::test]
    async fn counters_increment_independently() {
        let repo = InMemoryArticleRepository::new();
        let article = Article::new(fixtures::external_draft("Sleep"), UserId::random(), Utc::now());
        repo.insert(&article).await.expect("insert");

        repo.increment(&article.id, ArticleCounter::Views)
            .await
            .expect("view");
        let after = repo
            .increment(&article.id, ArticleCounter::Clicks)
            .await
            .expect("click")
            .expect("present");
        assert_eq!((after.views, after.clicks), (1, 1));

        let missing = repo
            .increment(&ArticleId::random(), ArticleCounter::Views)
            .await
            .expect("lookup");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn edits_keep_stored_counters() {
        let repo = InMemoryArticleRepository::new();
        let article = Article::new(fixtures::external_draft("Sleep"), UserId::random(), Utc::now());
        repo.insert(&article).await.expect("insert");
        repo.increment(&article.id, ArticleCounter::Views)
            .await
            .expect("view");

        let edited = repo
            .update(&article.id, &fixtures::internal_draft("Rest"), Utc::now())
            .await
            .expect("update")
            .expect("present");
        assert_eq!(edited.draft.title, "Rest");
        assert_eq!(edited.views, 1);

        let verified = repo
            .mark_verified(&article.id, Utc::now())
            .await
            .expect("verify")
            .expect("present");
        assert!(verified.is_verified);
        assert_eq!((verified.views, verified.draft.title.as_str()), (1, "Rest"));

        let missing = repo
            .mark_verified(&ArticleId::random(), Utc::now())
            .await
            .expect("lookup");
        assert!(missing.is_none());
    }
}
