//! Authentication API handlers
//!
//! Thin wrappers over `UserService`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest,
    UserProfileDto,
};
use crate::application::identity::UserService;
use crate::interfaces::http::common::{ApiError, ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/auth/user-register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<EmptyData>),
        (status = 400, description = "Validation error or email/phone already in use")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EmptyData>>), ApiError> {
    state.users.register(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("User registered successfully")),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/user-login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid email/phone or password")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let auth = state.users.login(&request.email_or_phone, &request.password).await?;
    Ok(Json(ApiResponse::with_message("Login successful", auth.into())))
}

/// Tokens are stateless; the client discards its copy.
#[utoipa::path(
    post,
    path = "/api/auth/user-logout",
    tag = "Authentication",
    responses((status = 200, description = "Logged out", body = ApiResponse<EmptyData>))
)]
pub async fn logout() -> Json<ApiResponse<EmptyData>> {
    Json(ApiResponse::message("User logged out"))
}

#[utoipa::path(
    get,
    path = "/api/auth/getUser/{user_id}",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = ApiResponse<UserProfileDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AuthHandlerState>,
    _user: AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserProfileDto>>, ApiError> {
    let profile = state.users.get_profile(&user_id).await?;
    Ok(Json(ApiResponse::success(profile.into())))
}

#[utoipa::path(
    put,
    path = "/api/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserProfileDto>),
        (status = 400, description = "Validation error or email/phone already in use"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_profile(
    State(state): State<AuthHandlerState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfileDto>>, ApiError> {
    let profile = state.users.update_profile(user.id(), request.into()).await?;
    Ok(Json(ApiResponse::with_message(
        "Profile updated successfully",
        profile.into(),
    )))
}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<EmptyData>),
        (status = 400, description = "Old password incorrect"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    state
        .users
        .change_password(user.id(), &request.old_password, &request.new_password)
        .await?;
    Ok(Json(ApiResponse::message("Password updated successfully")))
}
