//! Article API handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{to_dtos, ArticleDto, ArticleForm};
use super::form::ArticleParts;
use crate::application::publishing::ArticleService;
use crate::interfaces::http::common::{ApiError, ApiResponse, EmptyData};
use crate::interfaces::http::middleware::{AuthenticatedUser, MaybeUser};

#[derive(Clone)]
pub struct ArticleHandlerState {
    pub articles: Arc<ArticleService>,
}

#[utoipa::path(
    post,
    path = "/api/article/createArticles",
    tag = "Articles",
    security(("bearer_auth" = [])),
    request_body(content = ArticleForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Article created", body = ApiResponse<ArticleDto>),
        (status = 400, description = "Missing field or non-image upload"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn create_article(
    State(state): State<ArticleHandlerState>,
    user: AuthenticatedUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ArticleDto>>), ApiError> {
    let draft = ArticleParts::read(multipart).await?.into_draft();
    let article = state.articles.create(user.id(), draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Article created successfully", article.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/article/updateArticle/{article_id}",
    tag = "Articles",
    security(("bearer_auth" = [])),
    params(("article_id" = String, Path, description = "Article ID")),
    request_body(content = ArticleForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Article updated", body = ApiResponse<ArticleDto>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Article not found")
    )
)]
pub async fn update_article(
    State(state): State<ArticleHandlerState>,
    user: AuthenticatedUser,
    Path(article_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ArticleDto>>, ApiError> {
    let edit = ArticleParts::read(multipart).await?.into_edit();
    let article = state.articles.edit(user.id(), &article_id, edit).await?;
    Ok(Json(ApiResponse::with_message("Article updated successfully", article.into())))
}

#[utoipa::path(
    delete,
    path = "/api/article/deleteArticle/{article_id}",
    tag = "Articles",
    security(("bearer_auth" = [])),
    params(("article_id" = String, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Article not found")
    )
)]
pub async fn delete_article(
    State(state): State<ArticleHandlerState>,
    user: AuthenticatedUser,
    Path(article_id): Path<String>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    state.articles.delete(user.id(), &article_id).await?;
    Ok(Json(ApiResponse::message("Article deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/article/fetchAllArticles",
    tag = "Articles",
    responses((status = 200, description = "All articles, newest first", body = ApiResponse<Vec<ArticleDto>>))
)]
pub async fn fetch_all_articles(
    State(state): State<ArticleHandlerState>,
    viewer: MaybeUser,
) -> Result<Json<ApiResponse<Vec<ArticleDto>>>, ApiError> {
    let articles = state.articles.list_all(viewer.id()).await?;
    Ok(Json(ApiResponse::success(to_dtos(articles))))
}

#[utoipa::path(
    get,
    path = "/api/article/fetchArticlesByCategory/{category_id}",
    tag = "Articles",
    security(("bearer_auth" = [])),
    params(("category_id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Articles in the category, possibly none", body = ApiResponse<Vec<ArticleDto>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn fetch_articles_by_category(
    State(state): State<ArticleHandlerState>,
    user: AuthenticatedUser,
    Path(category_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ArticleDto>>>, ApiError> {
    let articles = state
        .articles
        .list_by_category(&category_id, Some(user.id()))
        .await?;
    Ok(Json(ApiResponse::success(to_dtos(articles))))
}

#[utoipa::path(
    get,
    path = "/api/article/getUserArticles/{user_id}",
    tag = "Articles",
    params(("user_id" = String, Path, description = "Author ID")),
    responses((status = 200, description = "Articles by the author", body = ApiResponse<Vec<ArticleDto>>))
)]
pub async fn get_user_articles(
    State(state): State<ArticleHandlerState>,
    viewer: MaybeUser,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ArticleDto>>>, ApiError> {
    let articles = state.articles.list_by_author(&user_id, viewer.id()).await?;
    Ok(Json(ApiResponse::success(to_dtos(articles))))
}

/// Blocked articles are still returned here so the viewer can unblock them.
#[utoipa::path(
    get,
    path = "/api/article/getArticleById/{article_id}",
    tag = "Articles",
    params(("article_id" = String, Path, description = "Article ID")),
    responses(
        (status = 200, description = "The article", body = ApiResponse<ArticleDto>),
        (status = 404, description = "Article not found")
    )
)]
pub async fn get_article_by_id(
    State(state): State<ArticleHandlerState>,
    Path(article_id): Path<String>,
) -> Result<Json<ApiResponse<ArticleDto>>, ApiError> {
    let article = state.articles.get(&article_id).await?;
    Ok(Json(ApiResponse::success(article.into())))
}
