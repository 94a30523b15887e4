use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Feed;
use crate::interfaces::http::modules::articles::{to_dtos, ArticleDto};

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedDto {
    /// `all`, `preferred` or `empty_preferred`
    pub kind: String,
    pub articles: Vec<ArticleDto>,
}

impl From<Feed> for FeedDto {
    fn from(feed: Feed) -> Self {
        let kind = feed.kind().to_string();
        let articles = match feed {
            Feed::All(a) | Feed::Preferred(a) => to_dtos(a),
            Feed::EmptyPreferred => Vec::new(),
        };
        Self { kind, articles }
    }
}
