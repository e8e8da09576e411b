//! Article aggregate for the resource library.
//!
//! An article is either written in-house (`internal`, carries `content`) or
//! links out to a third-party page (`external`, carries a URL plus optional
//! attribution). [`ArticleBody`] makes the two shapes exclusive.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::user::UserId;

/// Longest accepted title, in characters.
pub const TITLE_MAX: usize = 200;
/// Longest accepted excerpt, in characters.
pub const EXCERPT_MAX: usize = 300;
/// Category applied when none is supplied.
pub const DEFAULT_CATEGORY: &str = "mental-health";
/// Reading time applied when none is supplied, in minutes.
pub const DEFAULT_READING_TIME: u32 = 5;
/// Longest accepted reading time, in minutes.
pub const READING_TIME_MAX: u32 = 24 * 60;

/// Validation errors raised while building an article draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArticleValidationError {
    #[error("Please enter a title")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("Please enter an excerpt")]
    EmptyExcerpt,
    #[error("excerpt must be at most {max} characters")]
    ExcerptTooLong { max: usize },
    #[error("Please enter article content")]
    MissingContent,
    #[error("Please enter an external URL")]
    MissingExternalUrl,
    #[error("external_url must be an absolute http(s) URL")]
    InvalidExternalUrl,
    #[error("reading_time must be at most {max} minutes")]
    ReadingTimeTooLong { max: u32 },
    #[error("article_type must be internal or external")]
    InvalidKind,
    #[error("status must be published, draft, or archived")]
    InvalidStatus,
}

impl ArticleValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyExcerpt | Self::ExcerptTooLong { .. } => "excerpt",
            Self::MissingContent => "content",
            Self::MissingExternalUrl | Self::InvalidExternalUrl => "external_url",
            Self::ReadingTimeTooLong { .. } => "reading_time",
            Self::InvalidKind => "article_type",
            Self::InvalidStatus => "status",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::EmptyExcerpt | Self::MissingContent | Self::MissingExternalUrl => {
                "missing_field"
            }
            Self::TitleTooLong { .. }
            | Self::ExcerptTooLong { .. }
            | Self::ReadingTimeTooLong { .. } => "too_long",
            Self::InvalidExternalUrl => "invalid_url",
            Self::InvalidKind | Self::InvalidStatus => "invalid_value",
        }
    }
}

/// Identifier for an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(Uuid);

impl ArticleId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Variant discriminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleKind {
    Internal,
    #[default]
    External,
}

impl ArticleKind {
    /// Lowercase storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
        }
    }
}

impl FromStr for ArticleKind {
    type Err = ArticleValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "internal" => Ok(Self::Internal),
            "external" => Ok(Self::External),
            _ => Err(ArticleValidationError::InvalidKind),
        }
    }
}

/// Publication state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Published,
    Draft,
    Archived,
}

impl ArticleStatus {
    /// Lowercase storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
            Self::Archived => "archived",
        }
    }
}

impl FromStr for ArticleStatus {
    type Err = ArticleValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "published" => Ok(Self::Published),
            "draft" => Ok(Self::Draft),
            "archived" => Ok(Self::Archived),
            _ => Err(ArticleValidationError::InvalidStatus),
        }
    }
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleBody {
    Internal {
        content: String,
    },
    External {
        url: Url,
        source: Option<String>,
        author: Option<String>,
    },
}

impl ArticleBody {
    /// Discriminator for this body.
    pub fn kind(&self) -> ArticleKind {
        match self {
            Self::Internal { .. } => ArticleKind::Internal,
            Self::External { .. } => ArticleKind::External,
        }
    }
}

/// Unvalidated article fields as received from an adapter.
#[derive(Debug, Clone, Default)]
pub struct ArticleInput {
    pub title: Option<String>,
    pub article_type: Option<String>,
    pub content: Option<String>,
    pub external_url: Option<String>,
    pub external_source: Option<String>,
    pub original_author: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub reading_time: Option<u32>,
    pub status: Option<String>,
}

/// Validated editable fields of an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub body: ArticleBody,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub reading_time: u32,
    pub status: ArticleStatus,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
}

fn parse_external_url(raw: &str) -> Result<Url, ArticleValidationError> {
    let url = Url::parse(raw).map_err(|_| ArticleValidationError::InvalidExternalUrl)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ArticleValidationError::InvalidExternalUrl),
    }
}

impl TryFrom<ArticleInput> for ArticleDraft {
    type Error = ArticleValidationError;

    /// Validate an input.
    ///
    /// # Examples
    /// ```
    /// use mindspace::domain::{ArticleDraft, ArticleInput, ArticleKind};
    ///
    /// let draft = ArticleDraft::try_from(ArticleInput {
    ///     title: Some("Box breathing".into()),
    ///     excerpt: Some("A four-count technique.".into()),
    ///     external_url: Some("https://example.org/box".into()),
    ///     ..ArticleInput::default()
    /// })
    /// .unwrap();
    /// assert_eq!(draft.body.kind(), ArticleKind::External);
    /// assert_eq!(draft.category, "mental-health");
    /// ```
    fn try_from(input: ArticleInput) -> Result<Self, Self::Error> {
        let title = non_blank(input.title).ok_or(ArticleValidationError::EmptyTitle)?;
        if title.chars().count() > TITLE_MAX {
            return Err(ArticleValidationError::TitleTooLong { max: TITLE_MAX });
        }
        let excerpt = non_blank(input.excerpt).ok_or(ArticleValidationError::EmptyExcerpt)?;
        if excerpt.chars().count() > EXCERPT_MAX {
            return Err(ArticleValidationError::ExcerptTooLong { max: EXCERPT_MAX });
        }

        let reading_time = input.reading_time.unwrap_or(DEFAULT_READING_TIME);
        if reading_time > READING_TIME_MAX {
            return Err(ArticleValidationError::ReadingTimeTooLong {
                max: READING_TIME_MAX,
            });
        }

        let kind = input
            .article_type
            .as_deref()
            .map(str::parse::<ArticleKind>)
            .transpose()?
            .unwrap_or_default();
        let body = match kind {
            ArticleKind::Internal => ArticleBody::Internal {
                content: non_blank(input.content).ok_or(ArticleValidationError::MissingContent)?,
            },
            ArticleKind::External => {
                let raw = non_blank(input.external_url)
                    .ok_or(ArticleValidationError::MissingExternalUrl)?;
                ArticleBody::External {
                    url: parse_external_url(&raw)?,
                    source: non_blank(input.external_source),
                    author: non_blank(input.original_author),
                }
            }
        };

        let status = input
            .status
            .as_deref()
            .map(str::parse::<ArticleStatus>)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            title,
            body,
            excerpt,
            category: non_blank(input.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
            tags: input
                .tags
                .into_iter()
                .filter_map(|tag| non_blank(Some(tag)))
                .collect(),
            featured_image: non_blank(input.featured_image),
            reading_time,
            status,
        })
    }
}

/// Stored article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,
    pub draft: ArticleDraft,
    pub is_verified: bool,
    pub views: u64,
    pub clicks: u64,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Create a fresh, unverified article with zeroed counters.
    pub fn new(draft: ArticleDraft, created_by: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: ArticleId::random(),
            draft,
            is_verified: false,
            views: 0,
            clicks: 0,
            created_by: Some(created_by),
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive substring match over title, excerpt and category.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.draft.title, &self.draft.excerpt, &self.draft.category]
            .iter()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

/// Filters accepted by the article listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub kind: Option<ArticleKind>,
    pub status: Option<ArticleStatus>,
    pub search: Option<String>,
}

impl ArticleFilter {
    /// Whether `article` passes every configured filter.
    pub fn matches(&self, article: &Article) -> bool {
        self.kind.is_none_or(|kind| article.draft.body.kind() == kind)
            && self.status.is_none_or(|status| article.draft.status == status)
            && self
                .search
                .as_deref()
                .is_none_or(|needle| article.matches_search(needle))
    }
}
