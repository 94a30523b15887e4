use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CategoryDto, CategoryNameRequest};
use crate::application::publishing::CategoryService;
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct CategoryHandlerState {
    pub categories: Arc<CategoryService>,
}

#[utoipa::path(
    get,
    path = "/api/article/fetchCategories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All categories, newest first", body = ApiResponse<Vec<CategoryDto>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn fetch_categories(
    State(state): State<CategoryHandlerState>,
    _user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<CategoryDto>>>, ApiError> {
    let categories = state.categories.list().await?;
    Ok(Json(ApiResponse::success(
        categories.into_iter().map(CategoryDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/article/createCategories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    request_body = CategoryNameRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryDto>),
        (status = 400, description = "Name missing or already exists"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_category(
    State(state): State<CategoryHandlerState>,
    _user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CategoryNameRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryDto>>), ApiError> {
    let category = state.categories.create(&request.name).await?;
    let message = format!("{} is successfully created", category.name);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(message, category.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/article/editCategory/{category_id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("category_id" = String, Path, description = "Category ID")),
    request_body = CategoryNameRequest,
    responses(
        (status = 200, description = "Category renamed", body = ApiResponse<CategoryDto>),
        (status = 400, description = "Name missing or already exists"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn edit_category(
    State(state): State<CategoryHandlerState>,
    _user: AuthenticatedUser,
    Path(category_id): Path<String>,
    ValidatedJson(request): ValidatedJson<CategoryNameRequest>,
) -> Result<Json<ApiResponse<CategoryDto>>, ApiError> {
    let category = state.categories.rename(&category_id, &request.name).await?;
    Ok(Json(ApiResponse::with_message(
        "Category updated successfully",
        category.into(),
    )))
}
