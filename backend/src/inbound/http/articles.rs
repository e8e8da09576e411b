//! Article library handlers.
//!
//! ```text
//! GET    /api/articles?type=external&status=published&search=sleep
//! GET    /api/articles/{id}
//! POST   /api/articles
//! PUT    /api/articles/{id}
//! DELETE /api/articles/{id}
//! PATCH  /api/articles/{id}/verify
//! POST   /api/articles/{id}/click
//! ```
//!
//! Reads and click counting are public; everything else needs a bearer
//! token and the permissions enforced by the article service.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Article, ArticleBody, ArticleDraft, ArticleFilter, ArticleId, ArticleInput, ArticleKind,
    ArticleStatus, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponse;
use crate::inbound::http::validation::{FieldName, article_validation_error, parse_uuid};

const ARTICLE_ID: FieldName = FieldName::new("id");

/// Article as returned to clients. Internal articles carry `content`;
/// external ones carry the link and attribution fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticleResponse {
    pub id: String,
    pub title: String,
    #[schema(example = "external")]
    pub article_type: String,
    pub content: Option<String>,
    pub external_url: Option<String>,
    pub external_source: Option<String>,
    pub original_author: Option<String>,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub reading_time: u32,
    #[schema(example = "published")]
    pub status: String,
    pub is_verified: bool,
    pub views: u64,
    pub clicks: u64,
    pub created_by: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<Article> for ArticleResponse {
    fn from(value: Article) -> Self {
        let Article {
            id,
            draft,
            is_verified,
            views,
            clicks,
            created_by,
            created_at,
            updated_at,
        } = value;
        let article_type = draft.body.kind().as_str().to_owned();
        let (content, external_url, external_source, original_author) = match draft.body {
            ArticleBody::Internal { content } => (Some(content), None, None, None),
            ArticleBody::External {
                url,
                source,
                author,
            } => (None, Some(url.to_string()), source, author),
        };
        Self {
            id: id.to_string(),
            title: draft.title,
            article_type,
            content,
            external_url,
            external_source,
            original_author,
            excerpt: draft.excerpt,
            category: draft.category,
            tags: draft.tags,
            featured_image: draft.featured_image,
            reading_time: draft.reading_time,
            status: draft.status.as_str().to_owned(),
            is_verified,
            views,
            clicks,
            created_by: created_by.map(|id| id.to_string()),
            created_at: created_at.to_rfc3339(),
            updated_at: updated_at.to_rfc3339(),
        }
    }
}

/// Editable article fields for create and full-replace update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ArticleRequest {
    pub title: Option<String>,
    /// `internal` or `external` (default).
    pub article_type: Option<String>,
    pub content: Option<String>,
    pub external_url: Option<String>,
    pub external_source: Option<String>,
    pub original_author: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub reading_time: Option<u32>,
    /// `published` (default), `draft` or `archived`.
    pub status: Option<String>,
}

impl TryFrom<ArticleRequest> for ArticleDraft {
    type Error = Error;

    fn try_from(value: ArticleRequest) -> Result<Self, Self::Error> {
        ArticleDraft::try_from(ArticleInput {
            title: value.title,
            article_type: value.article_type,
            content: value.content,
            external_url: value.external_url,
            external_source: value.external_source,
            original_author: value.original_author,
            excerpt: value.excerpt,
            category: value.category,
            tags: value.tags,
            featured_image: value.featured_image,
            reading_time: value.reading_time,
            status: value.status,
        })
        .map_err(article_validation_error)
    }
}

/// Listing filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArticleListQuery {
    /// `internal` or `external`.
    #[serde(rename = "type")]
    pub article_type: Option<String>,
    /// `published`, `draft` or `archived`.
    pub status: Option<String>,
    /// Case-insensitive match over title, excerpt and category.
    pub search: Option<String>,
}

impl TryFrom<ArticleListQuery> for ArticleFilter {
    type Error = Error;

    fn try_from(value: ArticleListQuery) -> Result<Self, Self::Error> {
        let non_blank = |raw: Option<String>| raw.filter(|raw| !raw.trim().is_empty());
        Ok(Self {
            kind: non_blank(value.article_type)
                .map(|raw| raw.parse::<ArticleKind>())
                .transpose()
                .map_err(article_validation_error)?,
            status: non_blank(value.status)
                .map(|raw| raw.parse::<ArticleStatus>())
                .transpose()
                .map_err(article_validation_error)?,
            search: non_blank(value.search).map(|raw| raw.trim().to_owned()),
        })
    }
}

fn article_id(raw: &str) -> Result<ArticleId, Error> {
    parse_uuid(raw, ARTICLE_ID).map(ArticleId::from_uuid)
}

/// Articles matching the filters, newest first.
#[utoipa::path(
    get,
    path = "/api/articles",
    params(ArticleListQuery),
    responses(
        (status = 200, description = "Articles", body = [ArticleResponse]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["articles"],
    operation_id = "listArticles",
    security([])
)]
#[get("/articles")]
pub async fn list_articles(
    state: web::Data<HttpState>,
    query: web::Query<ArticleListQuery>,
) -> ApiResult<web::Json<Vec<ArticleResponse>>> {
    let filter = ArticleFilter::try_from(query.into_inner())?;
    let articles = state.articles.list_articles(&filter).await?;
    Ok(web::Json(
        articles.into_iter().map(ArticleResponse::from).collect(),
    ))
}

/// Read one article, counting the view.
#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article", body = ArticleResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Article not found", body = ErrorSchema)
    ),
    tags = ["articles"],
    operation_id = "getArticle",
    security([])
)]
#[get("/articles/{id}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ArticleResponse>> {
    let id = article_id(&path)?;
    let article = state.articles.view_article(&id).await?;
    Ok(web::Json(article.into()))
}

/// Publish a new article. Admins and psychologists only.
#[utoipa::path(
    post,
    path = "/api/articles",
    request_body = ArticleRequest,
    responses(
        (status = 201, description = "Article created", body = ArticleResponse),
        (status = 400, description = "Invalid article", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["articles"],
    operation_id = "createArticle",
    security(("bearer" = []))
)]
#[post("/articles")]
pub async fn create_article(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<ArticleRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ArticleDraft::try_from(payload.into_inner())?;
    let article = state
        .articles_command
        .create_article(caller.user(), draft)
        .await?;
    Ok(HttpResponse::Created().json(ArticleResponse::from(article)))
}

/// Replace the editable fields of an article.
#[utoipa::path(
    put,
    path = "/api/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    request_body = ArticleRequest,
    responses(
        (status = 200, description = "Article updated", body = ArticleResponse),
        (status = 400, description = "Invalid article", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Article not found", body = ErrorSchema)
    ),
    tags = ["articles"],
    operation_id = "updateArticle",
    security(("bearer" = []))
)]
#[put("/articles/{id}")]
pub async fn update_article(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<ArticleRequest>,
) -> ApiResult<web::Json<ArticleResponse>> {
    let id = article_id(&path)?;
    let draft = ArticleDraft::try_from(payload.into_inner())?;
    let article = state
        .articles_command
        .update_article(caller.user(), &id, draft)
        .await?;
    Ok(web::Json(article.into()))
}

/// Remove an article. Admin only.
#[utoipa::path(
    delete,
    path = "/api/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article deleted", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Article not found", body = ErrorSchema)
    ),
    tags = ["articles"],
    operation_id = "deleteArticle",
    security(("bearer" = []))
)]
#[delete("/articles/{id}")]
pub async fn delete_article(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = article_id(&path)?;
    state
        .articles_command
        .delete_article(caller.user(), &id)
        .await?;
    Ok(web::Json(MessageResponse {
        message: "Article deleted successfully".to_owned(),
    }))
}

/// Mark an article as verified. Admin only.
#[utoipa::path(
    patch,
    path = "/api/articles/{id}/verify",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article verified", body = ArticleResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Article not found", body = ErrorSchema)
    ),
    tags = ["articles"],
    operation_id = "verifyArticle",
    security(("bearer" = []))
)]
#[patch("/articles/{id}/verify")]
pub async fn verify_article(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ArticleResponse>> {
    let id = article_id(&path)?;
    let article = state
        .articles_command
        .verify_article(caller.user(), &id)
        .await?;
    Ok(web::Json(article.into()))
}

/// Count an outbound click on an article.
#[utoipa::path(
    post,
    path = "/api/articles/{id}/click",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Click recorded", body = ArticleResponse),
        (status = 404, description = "Article not found", body = ErrorSchema)
    ),
    tags = ["articles"],
    operation_id = "recordArticleClick",
    security([])
)]
#[post("/articles/{id}/click")]
pub async fn record_click(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ArticleResponse>> {
    let id = article_id(&path)?;
    let article = state.articles_command.record_click(&id).await?;
    Ok(web::Json(article.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{bearer, test_app};
    use crate::test_support::Harness;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn external_body(title: &str) -> Value {
        json!({
            "title": title,
            "excerpt": format!("{title}, in short."),
            "external_url": "https://example.org/sleep",
            "external_source": "Example Health",
            "tags": [" sleep ", ""],
        })
    }

    async fn create(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        token: &str,
        body: Value,
    ) -> Value {
        let req = actix_test::TestRequest::post()
            .uri("/api/articles")
            .insert_header(bearer(token))
            .set_json(body)
            .to_request();
        let res = actix_test::call_service(app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        actix_test::read_body_json(res).await
    }

    #[actix_web::test]
    async fn psychologist_creates_and_public_reads_count_views() {
        let harness = Harness::new();
        let (author, token) = harness.seed_user("dr_kim", Role::Psychologist).await;
        let app = actix_test::init_service(test_app(harness.state.clone())).await;

        let created = create(&app, &token, external_body("Sleep hygiene")).await;
        assert_eq!(created["article_type"], "external");
        assert_eq!(created["category"], "mental-health");
        assert_eq!(created["reading_time"], 5);
        assert_eq!(created["tags"], json!(["sleep"]));
        assert_eq!(created["created_by"], author.id.to_string());
        assert_eq!(created["views"], 0);

        let id = created["id"].as_str().expect("id");
        for expected in [1, 2] {
            let req = actix_test::TestRequest::get()
                .uri(&format!("/api/articles/{id}"))
                .to_request();
            let body: Value = actix_test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["views"], expected);
        }

        let req = actix_test::TestRequest::post()
            .uri(&format!("/api/articles/{id}/click"))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["clicks"], 1);
    }

    #[actix_web::test]
    async fn members_cannot_create_articles() {
        let harness = Harness::new();
        let (_, token) = harness.seed_user("amara", Role::User).await;
        let app = actix_test::init_service(test_app(harness.state.clone())).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/articles")
            .insert_header(bearer(&token))
            .set_json(external_body("Sleep hygiene"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[case::internal_without_content(json!({"title": "T", "excerpt": "E", "article_type": "internal"}), "content")]
    #[case::external_without_url(json!({"title": "T", "excerpt": "E"}), "external_url")]
    #[case::relative_url(json!({"title": "T", "excerpt": "E", "external_url": "/local"}), "external_url")]
    #[case::blank_title(json!({"title": " ", "excerpt": "E", "external_url": "https://a.org"}), "title")]
    #[case::day_long_read(json!({"title": "T", "excerpt": "E", "external_url": "https://a.org", "reading_time": 1441}), "reading_time")]
    #[actix_web::test]
    async fn invalid_articles_name_the_field(#[case] body: Value, #[case] field: &str) {
        let harness = Harness::new();
        let (_, token) = harness.seed_user("root", Role::Admin).await;
        let app = actix_test::init_service(test_app(harness.state.clone())).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/articles")
            .insert_header(bearer(&token))
            .set_json(body)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let payload: Value = actix_test::read_body_json(res).await;
        assert_eq!(payload["details"]["field"], field);
    }

    #[actix_web::test]
    async fn listing_filters_by_type_status_and_search() {
        let harness = Harness::new();
        let (_, token) = harness.seed_user("root", Role::Admin).await;
        let app = actix_test::init_service(test_app(harness.state.clone())).await;

        create(&app, &token, external_body("Sleep hygiene")).await;
        create(
            &app,
            &token,
            json!({
                "title": "Grounding",
                "excerpt": "Five senses, one minute.",
                "article_type": "internal",
                "content": "Name five things you can see.",
                "status": "draft",
            }),
        )
        .await;

        for (query, titles) in [
            ("", vec!["Grounding", "Sleep hygiene"]),
            ("?type=internal", vec!["Grounding"]),
            ("?status=published", vec!["Sleep hygiene"]),
            ("?search=SENSES", vec!["Grounding"]),
        ] {
            let req = actix_test::TestRequest::get()
                .uri(&format!("/api/articles{query}"))
                .to_request();
            let body: Value = actix_test::call_and_read_body_json(&app, req).await;
            let listed: Vec<&str> = body
                .as_array()
                .expect("array")
                .iter()
                .filter_map(|article| article["title"].as_str())
                .collect();
            assert_eq!(listed, titles, "query {query}");
        }

        let req = actix_test::TestRequest::get()
            .uri("/api/articles?type=video")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn moderation_is_admin_only() {
        let harness = Harness::new();
        let (_, author_token) = harness.seed_user("dr_kim", Role::Psychologist).await;
        let (_, admin_token) = harness.seed_user("root", Role::Admin).await;
        let app = actix_test::init_service(test_app(harness.state.clone())).await;

        let created = create(&app, &author_token, external_body("Sleep hygiene")).await;
        let id = created["id"].as_str().expect("id").to_owned();

        let req = actix_test::TestRequest::patch()
            .uri(&format!("/api/articles/{id}/verify"))
            .insert_header(bearer(&author_token))
            .to_request();
        assert_eq!(
            actix_test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = actix_test::TestRequest::patch()
            .uri(&format!("/api/articles/{id}/verify"))
            .insert_header(bearer(&admin_token))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["is_verified"], true);

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/articles/{id}"))
            .insert_header(bearer(&admin_token))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Article deleted successfully");

        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/articles/{id}"))
            .to_request();
        assert_eq!(
            actix_test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn authors_replace_their_own_articles_only() {
        let harness = Harness::new();
        let (_, kim_token) = harness.seed_user("dr_kim", Role::Psychologist).await;
        let (_, lee_token) = harness.seed_user("dr_lee", Role::Psychologist).await;
        let app = actix_test::init_service(test_app(harness.state.clone())).await;

        let created = create(&app, &kim_token, external_body("Sleep hygiene")).await;
        let id = created["id"].as_str().expect("id").to_owned();

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/articles/{id}"))
            .insert_header(bearer(&lee_token))
            .set_json(external_body("Hijacked"))
            .to_request();
        assert_eq!(
            actix_test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/articles/{id}"))
            .insert_header(bearer(&kim_token))
            .set_json(external_body("Better sleep"))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["title"], "Better sleep");
    }
}
