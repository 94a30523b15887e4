//! Authentication middleware for Axum

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use crate::domain::{RepositoryProvider, User};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenError};
use crate::interfaces::http::common::ApiResponse;

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    UserNotFound,
    Lookup,
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AuthError::ExpiredToken,
            TokenError::Invalid => AuthError::InvalidToken,
        }
    }
}

/// Authentication state containing JWT config and the user lookup
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub repos: Arc<dyn RepositoryProvider>,
}

/// The acting user, loaded from the token subject. `password_hash` is blank.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn id(&self) -> &str {
        &self.0.id
    }
}

/// Present only on routes behind `optional_auth_middleware`.
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn id(&self) -> Option<&str> {
        self.0.as_ref().map(|u| u.id.as_str())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| auth_error_response(AuthError::MissingToken))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            parts.extensions.get::<AuthenticatedUser>().map(|u| u.0.clone()),
        ))
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn bearer(request: &Request<Body>) -> Option<Result<String, AuthError>> {
    let header = request.headers().get(header::AUTHORIZATION)?;
    let token = header
        .to_str()
        .ok()
        .and_then(extract_token)
        .map(String::from)
        .ok_or(AuthError::InvalidToken);
    Some(token)
}

async fn resolve_user(token: &str, auth_state: &AuthState) -> Result<AuthenticatedUser, AuthError> {
    let claims = verify_token(token, &auth_state.jwt_config)?;

    let mut user = match auth_state.repos.users().get_user_by_id(&claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(AuthError::UserNotFound),
        Err(e) => {
            error!(error = %e, "User lookup failed during authentication");
            return Err(AuthError::Lookup);
        }
    };
    user.password_hash.clear();

    debug!(user_id = %user.id, "Request authenticated");
    Ok(AuthenticatedUser(user))
}

/// JWT authentication middleware. Rejects the request unless a valid token
/// for an existing user is present.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer(&request) {
        None => return auth_error_response(AuthError::MissingToken),
        Some(Err(e)) => return auth_error_response(e),
        Some(Ok(token)) => token,
    };

    match resolve_user(&token, &auth_state).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => auth_error_response(e),
    }
}

/// Optional authentication middleware
///
/// No `Authorization` header means an anonymous viewer. A header that is
/// present but does not verify is rejected like on protected routes.
pub async fn optional_auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match bearer(&request) {
        None => {}
        Some(Err(e)) => return auth_error_response(e),
        Some(Ok(token)) => match resolve_user(&token, &auth_state).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
            }
            Err(e) => return auth_error_response(e),
        },
    }

    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Not authorized, no token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, TokenError::Invalid.message()),
        AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, TokenError::Expired.message()),
        AuthError::UserNotFound => (StatusCode::UNAUTHORIZED, "User not found"),
        AuthError::Lookup => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
    };

    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    use crate::domain::UserRepository;
    use crate::infrastructure::crypto::jwt::create_token;
    use crate::test_support::{new_user_dto, test_db, test_repos};

    async fn whoami(user: AuthenticatedUser) -> String {
        format!("{}:{}", user.id(), user.0.password_hash.is_empty())
    }

    async fn maybe(viewer: MaybeUser) -> String {
        viewer.id().unwrap_or("anonymous").to_string()
    }

    async fn setup() -> (Router, AuthState, String) {
        let db = test_db().await;
        let repos = test_repos(&db);
        let user = repos.users().create_user(new_user_dto("ada@example.com", "1")).await.unwrap();
        let state = AuthState {
            jwt_config: JwtConfig {
                secret: "test-secret".into(),
                expiration_hours: 1,
                issuer: "readrealm".into(),
            },
            repos,
        };

        let app = Router::new()
            .route("/protected", get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
            .merge(
                Router::new()
                    .route("/optional", get(maybe))
                    .route_layer(middleware::from_fn_with_state(state.clone(), optional_auth_middleware)),
            );
        (app, state, user.id)
    }

    async fn call(app: &Router, uri: &str, auth: Option<&str>) -> (StatusCode, String) {
        let mut req = Request::builder().uri(uri);
        if let Some(value) = auth {
            req = req.header(header::AUTHORIZATION, value);
        }
        let resp = app.clone().oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_token_attaches_user_without_hash() {
        let (app, state, user_id) = setup().await;
        let token = create_token(&user_id, &state.jwt_config).unwrap();

        let (status, body) = call(&app, "/protected", Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("{}:true", user_id));
    }

    #[tokio::test]
    async fn missing_malformed_and_tampered_tokens_are_401() {
        let (app, state, user_id) = setup().await;
        let token = create_token(&user_id, &state.jwt_config).unwrap();

        assert_eq!(call(&app, "/protected", None).await.0, StatusCode::UNAUTHORIZED);
        assert_eq!(call(&app, "/protected", Some("Token abc")).await.0, StatusCode::UNAUTHORIZED);
        let tampered = format!("Bearer {}x", token);
        assert_eq!(call(&app, "/protected", Some(&tampered)).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_401() {
        let (app, state, _) = setup().await;
        let token = create_token("ghost", &state.jwt_config).unwrap();
        let (status, body) = call(&app, "/protected", Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("User not found"));
    }

    #[tokio::test]
    async fn optional_auth_allows_anonymous_but_not_bad_tokens() {
        let (app, state, user_id) = setup().await;
        let token = create_token(&user_id, &state.jwt_config).unwrap();

        assert_eq!(call(&app, "/optional", None).await, (StatusCode::OK, "anonymous".into()));
        assert_eq!(
            call(&app, "/optional", Some(&format!("Bearer {}", token))).await,
            (StatusCode::OK, user_id)
        );
        assert_eq!(call(&app, "/optional", Some("Bearer junk")).await.0, StatusCode::UNAUTHORIZED);
    }
}
