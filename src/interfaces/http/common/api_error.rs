//! Maps domain errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::domain::DomainError;

/// Handler error. Wraps `DomainError` so handlers can use `?` on service calls.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_)
            | DomainError::DuplicateIdentity(_)
            | DomainError::DuplicateCategory(_)
            | DomainError::InvalidCredentials => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match &self.0 {
            DomainError::NotFound { entity, .. } => format!("{} not found", entity),
            DomainError::Unauthorized(msg) | DomainError::Forbidden(msg) => msg.clone(),
            e if e.is_internal() => "Server error".to_string(),
            e => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_internal() {
            error!(error = %self.0, "Request failed");
        }
        let body = ApiResponse::<()>::error(self.client_message());
        (status, Json(body)).into_response()
    }
}
