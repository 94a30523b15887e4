use serde::Serialize;
use utoipa::ToSchema;

use crate::application::EngagementOutcome;
use crate::interfaces::http::modules::articles::ArticleDto;

#[derive(Debug, Serialize, ToSchema)]
pub struct EngagementDto {
    /// liked, unliked, disliked, undisliked, blocked or unblocked
    pub action: String,
    pub article: ArticleDto,
}

impl From<EngagementOutcome> for EngagementDto {
    fn from(o: EngagementOutcome) -> Self {
        Self {
            action: o.action.as_str().to_string(),
            article: o.article.into(),
        }
    }
}
