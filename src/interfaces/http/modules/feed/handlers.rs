use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::FeedDto;
use crate::application::FeedComposer;
use crate::domain::Feed;
use crate::interfaces::http::common::{ApiError, ApiResponse};
use crate::interfaces::http::middleware::MaybeUser;

#[derive(Clone)]
pub struct FeedHandlerState {
    pub feed: Arc<FeedComposer>,
}

#[utoipa::path(
    get,
    path = "/api/article/feed",
    tag = "Articles",
    responses(
        (status = 200, description = "Composed feed; kind tells which branch produced it", body = ApiResponse<FeedDto>),
        (status = 401, description = "Token present but invalid")
    )
)]
pub async fn get_feed(
    State(state): State<FeedHandlerState>,
    viewer: MaybeUser,
) -> Result<Json<ApiResponse<FeedDto>>, ApiError> {
    let feed = state.feed.compose(viewer.0.as_ref()).await?;
    let response = match feed {
        Feed::EmptyPreferred => ApiResponse::with_message(
            "No articles found in your preferred categories",
            FeedDto::from(feed),
        ),
        feed => ApiResponse::success(FeedDto::from(feed)),
    };
    Ok(Json(response))
}
