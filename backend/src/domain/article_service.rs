//! Article browsing, authoring and moderation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::domain::ports::{
    ArticleCounter, ArticlePersistenceError, ArticleRepository, ArticlesCommand, ArticlesQuery,
};
use crate::domain::{Article, ArticleDraft, ArticleFilter, ArticleId, Error, User};

const ARTICLE_NOT_FOUND: &str = "Article not found";

/// Article service implementing the article driving ports.
#[derive(Clone)]
pub struct ArticleService<A> {
    articles: Arc<A>,
}

impl<A> ArticleService<A> {
    /// Create a new service over the given repository.
    pub fn new(articles: Arc<A>) -> Self {
        Self { articles }
    }
}

fn map_article_error(error: ArticlePersistenceError) -> Error {
    match error {
        ArticlePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("article repository unavailable: {message}"))
        }
        ArticlePersistenceError::Query { message } => {
            Error::internal(format!("article repository error: {message}"))
        }
    }
}

fn require_admin(actor: &User) -> Result<(), Error> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden("Admin access required"))
    }
}

/// Admins may edit anything; psychologists only what they created.
fn ensure_may_edit(actor: &User, article: &Article) -> Result<(), Error> {
    let authored = actor.can_author_articles() && article.created_by == Some(actor.id);
    if actor.is_admin() || authored {
        Ok(())
    } else {
        Err(Error::forbidden("Not authorized to edit this article"))
    }
}

impl<A: ArticleRepository> ArticleService<A> {
    async fn load(&self, id: &ArticleId) -> Result<Article, Error> {
        self.articles
            .find_by_id(id)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(ARTICLE_NOT_FOUND))
    }

    async fn bump(&self, id: &ArticleId, counter: ArticleCounter) -> Result<Article, Error> {
        self.articles
            .increment(id, counter)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(ARTICLE_NOT_FOUND))
    }
}

#[async_trait]
impl<A: ArticleRepository> ArticlesQuery for ArticleService<A> {
    async fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>, Error> {
        self.articles.list(filter).await.map_err(map_article_error)
    }

    async fn view_article(&self, id: &ArticleId) -> Result<Article, Error> {
        self.bump(id, ArticleCounter::Views).await
    }
}

#[async_trait]
impl<A: ArticleRepository> ArticlesCommand for ArticleService<A> {
    async fn create_article(&self, actor: &User, draft: ArticleDraft) -> Result<Article, Error> {
        if !actor.can_author_articles() {
            return Err(Error::forbidden(
                "Only admins and psychologists can create articles",
            ));
        }
        let article = Article::new(draft, actor.id, Utc::now());
        self.articles
            .insert(&article)
            .await
            .map_err(map_article_error)?;
        info!(article_id = %article.id, author_id = %actor.id, "article created");
        Ok(article)
    }

    async fn update_article(
        &self,
        actor: &User,
        id: &ArticleId,
        draft: ArticleDraft,
    ) -> Result<Article, Error> {
        let existing = self.load(id).await?;
        ensure_may_edit(actor, &existing)?;
        let article = self
            .articles
            .update(id, &draft, Utc::now())
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(ARTICLE_NOT_FOUND))?;
        info!(article_id = %article.id, actor_id = %actor.id, "article updated");
        Ok(article)
    }

    async fn delete_article(&self, actor: &User, id: &ArticleId) -> Result<(), Error> {
        require_admin(actor)?;
        if !self.articles.delete(id).await.map_err(map_article_error)? {
            return Err(Error::not_found(ARTICLE_NOT_FOUND));
        }
        info!(article_id = %id, actor_id = %actor.id, "article deleted");
        Ok(())
    }

    async fn verify_article(&self, actor: &User, id: &ArticleId) -> Result<Article, Error> {
        require_admin(actor)?;
        let article = self
            .articles
            .mark_verified(id, Utc::now())
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(ARTICLE_NOT_FOUND))?;
        info!(article_id = %article.id, actor_id = %actor.id, "article verified");
        Ok(article)
    }

    async fn record_click(&self, id: &ArticleId) -> Result<Article, Error> {
        self.bump(id, ArticleCounter::Clicks).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::Role;
    use crate::domain::ports::MockArticleRepository;
    use crate::outbound::memory::InMemoryArticleRepository;
    use crate::test_support::fixtures;
    use chrono::DateTime;
    use rstest::rstest;

    fn make_service(repo: MockArticleRepository) -> ArticleService<MockArticleRepository> {
        ArticleService::new(Arc::new(repo))
    }

    fn stored_article(author: &User) -> Article {
        Article::new(fixtures::external_draft("Sleep hygiene"), author.id, Utc::now())
    }

    #[rstest]
    #[case::admin(Role::Admin)]
    #[case::psychologist(Role::Psychologist)]
    #[tokio::test]
    async fn authors_can_create_articles(#[case] role: Role) {
        let actor = fixtures::user(role);
        let author_id = actor.id;
        let mut repo = MockArticleRepository::new();
        repo.expect_insert()
            .withf(move |article| article.created_by == Some(author_id) && !article.is_verified)
            .times(1)
            .return_once(|_| Ok(()));

        let article = make_service(repo)
            .create_article(&actor, fixtures::external_draft("Box breathing"))
            .await
            .expect("created");
        assert_eq!(article.views, 0);
        assert_eq!(article.clicks, 0);
    }

    #[tokio::test]
    async fn members_cannot_create_articles() {
        let actor = fixtures::user(Role::User);
        let error = make_service(MockArticleRepository::new())
            .create_article(&actor, fixtures::external_draft("Nope"))
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case::own_article(true, true)]
    #[case::someone_elses_article(false, false)]
    #[tokio::test]
    async fn psychologists_edit_only_their_own_articles(
        #[case] own: bool,
        #[case] allowed: bool,
    ) {
        let actor = fixtures::user(Role::Psychologist);
        let author = if own {
            actor.clone()
        } else {
            fixtures::user(Role::Psychologist)
        };
        let existing = stored_article(&author);
        let id = existing.id;
        let author_id = author.id;
        let mut repo = MockArticleRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_update()
            .returning(move |_, draft, now| {
                let mut article = Article::new(draft.clone(), author_id, now);
                article.id = id;
                Ok(Some(article))
            });

        let result = make_service(repo)
            .update_article(&actor, &id, fixtures::internal_draft("Rewritten"))
            .await;
        match (allowed, result) {
            (true, Ok(article)) => assert_eq!(article.draft.title, "Rewritten"),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Forbidden),
            (true, Err(err)) => panic!("expected success, got {err:?}"),
            (false, Ok(_)) => panic!("expected forbidden"),
        }
    }

    #[rstest]
    #[case::member(Role::User)]
    #[case::psychologist(Role::Psychologist)]
    #[tokio::test]
    async fn moderation_requires_admin(#[case] role: Role) {
        let actor = fixtures::user(role);
        let service = make_service(MockArticleRepository::new());
        let id = ArticleId::random();

        let delete = service.delete_article(&actor, &id).await.expect_err("forbidden");
        assert_eq!(delete.code(), ErrorCode::Forbidden);
        let verify = service.verify_article(&actor, &id).await.expect_err("forbidden");
        assert_eq!(verify.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn admin_verifies_article() {
        let admin = fixtures::user(Role::Admin);
        let existing = stored_article(&fixtures::user(Role::Psychologist));
        let id = existing.id;
        let mut repo = MockArticleRepository::new();
        repo.expect_find_by_id().never();
        repo.expect_update().never();
        repo.expect_mark_verified()
            .withf(move |target, _| *target == id)
            .times(1)
            .return_once(move |_, now| {
                let mut article = existing;
                article.is_verified = true;
                article.updated_at = now;
                Ok(Some(article))
            });

        let article = make_service(repo)
            .verify_article(&admin, &id)
            .await
            .expect("verified");
        assert!(article.is_verified);
    }

    #[tokio::test]
    async fn viewing_counts_a_view() {
        let existing = stored_article(&fixtures::user(Role::Admin));
        let id = existing.id;
        let mut repo = MockArticleRepository::new();
        repo.expect_increment()
            .withf(move |target, counter| *target == id && *counter == ArticleCounter::Views)
            .times(1)
            .return_once(move |_, _| {
                let mut article = existing;
                article.views += 1;
                Ok(Some(article))
            });

        let article = make_service(repo).view_article(&id).await.expect("viewed");
        assert_eq!(article.views, 1);
    }

    #[tokio::test]
    async fn clicking_unknown_article_is_not_found() {
        let mut repo = MockArticleRepository::new();
        repo.expect_increment()
            .times(1)
            .return_once(|_, _| Ok(None));

        let error = make_service(repo)
            .record_click(&ArticleId::random())
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn admin_delete_of_unknown_article_is_not_found() {
        let admin = fixtures::user(Role::Admin);
        let mut repo = MockArticleRepository::new();
        repo.expect_delete().times(1).return_once(|_| Ok(false));

        let error = make_service(repo)
            .delete_article(&admin, &ArticleId::random())
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn connection_failures_surface_as_service_unavailable() {
        let mut repo = MockArticleRepository::new();
        repo.expect_list()
            .times(1)
            .return_once(|_| Err(ArticlePersistenceError::connection("refused")));

        let error = make_service(repo)
            .list_articles(&ArticleFilter::default())
            .await
            .expect_err("unavailable");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }

    /// Records a view inside every edit, as a concurrent reader would.
    struct ViewDuringWrite(InMemoryArticleRepository);

    #[async_trait]
    impl ArticleRepository for ViewDuringWrite {
        async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
            self.0.insert(article).await
        }

        async fn update(
            &self,
            id: &ArticleId,
            draft: &ArticleDraft,
            updated_at: DateTime<Utc>,
        ) -> Result<Option<Article>, ArticlePersistenceError> {
            self.0.increment(id, ArticleCounter::Views).await?;
            self.0.update(id, draft, updated_at).await
        }

        async fn mark_verified(
            &self,
            id: &ArticleId,
            updated_at: DateTime<Utc>,
        ) -> Result<Option<Article>, ArticlePersistenceError> {
            self.0.increment(id, ArticleCounter::Views).await?;
            self.0.mark_verified(id, updated_at).await
        }

        async fn find_by_id(
            &self,
            id: &ArticleId,
        ) -> Result<Option<Article>, ArticlePersistenceError> {
            self.0.find_by_id(id).await
        }

        async fn list(
            &self,
            filter: &ArticleFilter,
        ) -> Result<Vec<Article>, ArticlePersistenceError> {
            self.0.list(filter).await
        }

        async fn delete(&self, id: &ArticleId) -> Result<bool, ArticlePersistenceError> {
            self.0.delete(id).await
        }

        async fn increment(
            &self,
            id: &ArticleId,
            counter: ArticleCounter,
        ) -> Result<Option<Article>, ArticlePersistenceError> {
            self.0.increment(id, counter).await
        }
    }

    #[tokio::test]
    async fn views_recorded_during_edits_survive() {
        let author = fixtures::user(Role::Psychologist);
        let admin = fixtures::user(Role::Admin);
        let service = ArticleService::new(Arc::new(ViewDuringWrite(
            InMemoryArticleRepository::new(),
        )));
        let created = service
            .create_article(&author, fixtures::external_draft("Grounding"))
            .await
            .expect("created");
        service.record_click(&created.id).await.expect("clicked");

        let verified = service
            .verify_article(&admin, &created.id)
            .await
            .expect("verified");
        assert!(verified.is_verified);
        assert_eq!((verified.views, verified.clicks), (1, 1));

        let edited = service
            .update_article(&author, &created.id, fixtures::internal_draft("Rooted"))
            .await
            .expect("edited");
        assert!(edited.is_verified);
        assert_eq!(edited.draft.title, "Rooted");
        assert_eq!((edited.views, edited.clicks), (2, 1));

        let viewed = service.view_article(&created.id).await.expect("viewed");
        assert_eq!(viewed.views, 3);
    }

    #[tokio::test]
    async fn verifying_unknown_article_is_not_found() {
        let admin = fixtures::user(Role::Admin);
        let mut repo = MockArticleRepository::new();
        repo.expect_mark_verified()
            .times(1)
            .return_once(|_, _| Ok(None));

        let error = make_service(repo)
            .verify_article(&admin, &ArticleId::random())
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
