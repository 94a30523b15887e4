use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Article;

/// Public prefix the uploaded images are served under.
pub const IMAGE_ROUTE: &str = "/articleImages";

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDto {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Stored filename.
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub category: String,
    pub created_by: String,
    pub likes: Vec<String>,
    pub dislikes: Vec<String>,
    pub blocked_by: Vec<String>,
    pub like_count: usize,
    pub dislike_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Article> for ArticleDto {
    fn from(a: Article) -> Self {
        Self {
            image_url: a.image.as_ref().map(|f| format!("{}/{}", IMAGE_ROUTE, f)),
            like_count: a.like_count(),
            dislike_count: a.dislike_count(),
            id: a.id,
            title: a.title,
            description: a.description,
            image: a.image,
            tags: a.tags,
            category: a.category_id,
            created_by: a.author_id,
            likes: a.likes.into_iter().collect(),
            dislikes: a.dislikes.into_iter().collect(),
            blocked_by: a.blocked_by.into_iter().collect(),
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

pub fn to_dtos(articles: Vec<Article>) -> Vec<ArticleDto> {
    articles.into_iter().map(ArticleDto::from).collect()
}

/// Multipart body for create and update. Documentation only; the handlers
/// read the parts directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ArticleForm {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Category ID.
    pub category: Option<String>,
    /// JSON array (`["rust","web"]`) or comma-separated list.
    pub tags: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}
