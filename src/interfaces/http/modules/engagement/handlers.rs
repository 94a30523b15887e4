//! Engagement toggles. The `{user_id}` segment must be the caller.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::EngagementDto;
use crate::application::{EngagementOutcome, EngagementService};
use crate::interfaces::http::common::{ApiError, ApiResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct EngagementHandlerState {
    pub engagement: Arc<EngagementService>,
}

fn respond(outcome: EngagementOutcome) -> Json<ApiResponse<EngagementDto>> {
    Json(ApiResponse::with_message(outcome.action.message(), outcome.into()))
}

#[utoipa::path(
    put,
    path = "/api/article/like/{user_id}/{article_id}",
    tag = "Engagement",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = String, Path, description = "Acting user; must match the token"),
        ("article_id" = String, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Liked or unliked", body = ApiResponse<EngagementDto>),
        (status = 403, description = "User ID does not match the token"),
        (status = 404, description = "Article not found")
    )
)]
pub async fn like_article(
    State(state): State<EngagementHandlerState>,
    user: AuthenticatedUser,
    Path((user_id, article_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<EngagementDto>>, ApiError> {
    let outcome = state.engagement.like(user.id(), &user_id, &article_id).await?;
    Ok(respond(outcome))
}

#[utoipa::path(
    put,
    path = "/api/article/dislike/{user_id}/{article_id}",
    tag = "Engagement",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = String, Path, description = "Acting user; must match the token"),
        ("article_id" = String, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Disliked or undisliked", body = ApiResponse<EngagementDto>),
        (status = 403, description = "User ID does not match the token"),
        (status = 404, description = "Article not found")
    )
)]
pub async fn dislike_article(
    State(state): State<EngagementHandlerState>,
    user: AuthenticatedUser,
    Path((user_id, article_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<EngagementDto>>, ApiError> {
    let outcome = state.engagement.dislike(user.id(), &user_id, &article_id).await?;
    Ok(respond(outcome))
}

#[utoipa::path(
    put,
    path = "/api/article/block/{user_id}/{article_id}",
    tag = "Engagement",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = String, Path, description = "Acting user; must match the token"),
        ("article_id" = String, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Blocked or unblocked", body = ApiResponse<EngagementDto>),
        (status = 403, description = "User ID does not match the token"),
        (status = 404, description = "Article not found")
    )
)]
pub async fn block_article(
    State(state): State<EngagementHandlerState>,
    user: AuthenticatedUser,
    Path((user_id, article_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<EngagementDto>>, ApiError> {
    let outcome = state.engagement.block(user.id(), &user_id, &article_id).await?;
    Ok(respond(outcome))
}
