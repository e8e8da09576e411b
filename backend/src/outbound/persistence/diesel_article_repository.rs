//! PostgreSQL-backed `ArticleRepository` implementation using Diesel ORM.
//!
//! The `internal`/`external` discriminator is stored in `article_type`;
//! columns that do not apply to a row's kind are kept `NULL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use url::Url;

use crate::domain::ports::{ArticleCounter, ArticlePersistenceError, ArticleRepository};
use crate::domain::{
    Article, ArticleBody, ArticleDraft, ArticleFilter, ArticleId, ArticleKind, ArticleStatus,
    UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ArticleChangeset, ArticleRow};
use super::pool::{DbPool, PoolError};
use super::schema::articles;

/// Diesel-backed implementation of the [`ArticleRepository`] port.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ArticlePersistenceError {
    map_pool_error(error, ArticlePersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ArticlePersistenceError {
    map_diesel_error(
        error,
        ArticlePersistenceError::query,
        ArticlePersistenceError::connection,
    )
}

fn corrupt(row_id: uuid::Uuid, column: &str) -> ArticlePersistenceError {
    warn!(article_id = %row_id, column, "stored article row failed validation");
    ArticlePersistenceError::query(format!("stored article {column} is invalid"))
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn row_to_article(row: ArticleRow) -> Result<Article, ArticlePersistenceError> {
    let id = row.id;
    let kind = row
        .article_type
        .parse::<ArticleKind>()
        .map_err(|_| corrupt(id, "article_type"))?;
    let body = match kind {
        ArticleKind::Internal => ArticleBody::Internal {
            content: row.content.ok_or_else(|| corrupt(id, "content"))?,
        },
        ArticleKind::External => {
            let raw = row.external_url.ok_or_else(|| corrupt(id, "external_url"))?;
            ArticleBody::External {
                url: Url::parse(&raw).map_err(|_| corrupt(id, "external_url"))?,
                source: row.external_source,
                author: row.original_author,
            }
        }
    };
    let status = row
        .status
        .parse::<ArticleStatus>()
        .map_err(|_| corrupt(id, "status"))?;

    Ok(Article {
        id: ArticleId::from_uuid(id),
        draft: ArticleDraft {
            title: row.title,
            body,
            excerpt: row.excerpt,
            category: row.category,
            tags: row.tags,
            featured_image: row.featured_image,
            reading_time: u32::try_from(row.reading_time)
                .map_err(|_| corrupt(id, "reading_time"))?,
            status,
        },
        is_verified: row.is_verified,
        views: u64::try_from(row.views).map_err(|_| corrupt(id, "views"))?,
        clicks: u64::try_from(row.clicks).map_err(|_| corrupt(id, "clicks"))?,
        created_by: row.created_by.map(UserId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn out_of_range(column: &str, value: impl std::fmt::Display) -> ArticlePersistenceError {
    ArticlePersistenceError::query(format!("{column} {value} does not fit its column"))
}

fn draft_changeset(
    draft: &ArticleDraft,
    updated_at: DateTime<Utc>,
) -> Result<ArticleChangeset, ArticlePersistenceError> {
    let (content, external_url, external_source, original_author) = match &draft.body {
        ArticleBody::Internal { content } => (Some(content.clone()), None, None, None),
        ArticleBody::External {
            url,
            source,
            author,
        } => (
            None,
            Some(url.to_string()),
            source.clone(),
            author.clone(),
        ),
    };
    Ok(ArticleChangeset {
        title: draft.title.clone(),
        article_type: draft.body.kind().as_str().to_owned(),
        content,
        external_url,
        external_source,
        original_author,
        excerpt: draft.excerpt.clone(),
        category: draft.category.clone(),
        tags: draft.tags.clone(),
        featured_image: draft.featured_image.clone(),
        reading_time: i32::try_from(draft.reading_time)
            .map_err(|_| out_of_range("reading_time", draft.reading_time))?,
        status: draft.status.as_str().to_owned(),
        updated_at,
    })
}

fn article_to_row(article: &Article) -> Result<ArticleRow, ArticlePersistenceError> {
    let ArticleChangeset {
        title,
        article_type,
        content,
        external_url,
        external_source,
        original_author,
        excerpt,
        category,
        tags,
        featured_image,
        reading_time,
        status,
        updated_at,
    } = draft_changeset(&article.draft, article.updated_at)?;
    Ok(ArticleRow {
        id: *article.id.as_uuid(),
        title,
        article_type,
        content,
        external_url,
        external_source,
        original_author,
        excerpt,
        category,
        tags,
        featured_image,
        reading_time,
        status,
        is_verified: article.is_verified,
        views: i64::try_from(article.views).map_err(|_| out_of_range("views", article.views))?,
        clicks: i64::try_from(article.clicks)
            .map_err(|_| out_of_range("clicks", article.clicks))?,
        created_by: article.created_by.map(|id| *id.as_uuid()),
        created_at: article.created_at,
        updated_at,
    })
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(articles::table)
            .values(&article_to_row(article)?)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn update(
        &self,
        id: &ArticleId,
        draft: &ArticleDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let changes = draft_changeset(draft, updated_at)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::update(articles::table.find(*id.as_uuid()))
            .set(&changes)
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_article).transpose()
    }

    async fn mark_verified(
        &self,
        id: &ArticleId,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = diesel::update(articles::table.find(*id.as_uuid()))
            .set((
                articles::is_verified.eq(true),
                articles::updated_at.eq(updated_at),
            ))
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_article).transpose()
    }

    async fn find_by_id(
        &self,
        id: &ArticleId,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = articles::table
            .find(*id.as_uuid())
            .select(ArticleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_article).transpose()
    }

    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = articles::table
            .select(ArticleRow::as_select())
            .order(articles::created_at.desc())
            .into_boxed();
        if let Some(kind) = filter.kind {
            query = query.filter(articles::article_type.eq(kind.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(articles::status.eq(status.as_str()));
        }
        if let Some(needle) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(needle.trim());
            query = query.filter(
                articles::title
                    .ilike(pattern.clone())
                    .or(articles::excerpt.ilike(pattern.clone()))
                    .or(articles::category.ilike(pattern)),
            );
        }
        let rows: Vec<ArticleRow> = query.load(&mut conn).await.map_err(diesel_error)?;
        rows.into_iter().map(row_to_article).collect()
    }

    async fn delete(&self, id: &ArticleId) -> Result<bool, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let affected = diesel::delete(articles::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(affected > 0)
    }

    async fn increment(
        &self,
        id: &ArticleId,
        counter: ArticleCounter,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let target = articles::table.find(*id.as_uuid());
        let row = match counter {
            ArticleCounter::Views => {
                diesel::update(target)
                    .set(articles::views.eq(articles::views + 1))
                    .returning(ArticleRow::as_returning())
                    .get_result(&mut conn)
                    .await
            }
            ArticleCounter::Clicks => {
                diesel::update(target)
                    .set(articles::clicks.eq(articles::clicks + 1))
                    .returning(ArticleRow::as_returning())
                    .get_result(&mut conn)
                    .await
            }
        }
        .optional()
        .map_err(diesel_error)?;
        row.map(row_to_article).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion and pattern escaping coverage.
    use super::*;
    use crate::domain::Role;
    use crate::test_support::fixtures;
    use rstest::rstest;

    #[rstest]
    #[case("calm", "%calm%")]
    #[case("100%", "%100\\%%")]
    #[case("snake_case", "%snake\\_case%")]
    fn like_pattern_escapes_wildcards(#[case] needle: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(needle), expected);
    }

    #[rstest]
    #[case::external(fixtures::external_draft("Grounding"))]
    #[case::internal(fixtures::internal_draft("Breathing"))]
    fn rows_convert_back_to_articles(#[case] draft: ArticleDraft) {
        let author = fixtures::user(Role::Psychologist);
        let mut article = Article::new(draft, author.id, Utc::now());
        article.views = 7;

        let row = article_to_row(&article).expect("representable");
        let restored = row_to_article(row).expect("valid row");
        assert_eq!(restored, article);
    }

    #[rstest]
    fn internal_rows_without_content_are_corrupt() {
        let author = fixtures::user(Role::Admin);
        let article = Article::new(fixtures::internal_draft("Sleep"), author.id, Utc::now());
        let mut row = article_to_row(&article).expect("representable");
        row.content = None;
        assert!(matches!(
            row_to_article(row),
            Err(ArticlePersistenceError::Query { .. })
        ));
    }

    #[rstest]
    fn reading_time_beyond_column_range_is_an_error() {
        let mut draft = fixtures::internal_draft("Marathon");
        draft.reading_time = u32::MAX;
        assert!(matches!(
            draft_changeset(&draft, Utc::now()),
            Err(ArticlePersistenceError::Query { .. })
        ));
    }
}
