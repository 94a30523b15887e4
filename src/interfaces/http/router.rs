//! API Router with Swagger UI

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    ArticleService, CategoryService, EngagementService, FeedComposer, ImageStore, UserService,
};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::interfaces::http::middleware::{auth_middleware, optional_auth_middleware, AuthState};
use crate::interfaces::http::modules::{
    articles, auth, categories, engagement, feed, health, metrics, request_id,
};

/// Every application service the HTTP layer talks to.
#[derive(Clone)]
pub struct ApiServices {
    pub users: Arc<UserService>,
    pub categories: Arc<CategoryService>,
    pub articles: Arc<ArticleService>,
    pub engagement: Arc<EngagementService>,
    pub feed: Arc<FeedComposer>,
    pub auth: AuthState,
}

impl ApiServices {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jwt_config: JwtConfig,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(repos.clone(), jwt_config.clone())),
            categories: Arc::new(CategoryService::new(repos.clone())),
            articles: Arc::new(ArticleService::new(repos.clone(), images)),
            engagement: Arc::new(EngagementService::new(repos.clone())),
            feed: Arc::new(FeedComposer::new(repos.clone())),
            auth: AuthState { jwt_config, repos },
        }
    }
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<ApiServices> for auth::AuthHandlerState {
    fn from_ref(s: &ApiServices) -> Self {
        Self { users: Arc::clone(&s.users) }
    }
}

impl FromRef<ApiServices> for categories::CategoryHandlerState {
    fn from_ref(s: &ApiServices) -> Self {
        Self { categories: Arc::clone(&s.categories) }
    }
}

impl FromRef<ApiServices> for articles::ArticleHandlerState {
    fn from_ref(s: &ApiServices) -> Self {
        Self { articles: Arc::clone(&s.articles) }
    }
}

impl FromRef<ApiServices> for engagement::EngagementHandlerState {
    fn from_ref(s: &ApiServices) -> Self {
        Self { engagement: Arc::clone(&s.engagement) }
    }
}

impl FromRef<ApiServices> for feed::FeedHandlerState {
    fn from_ref(s: &ApiServices) -> Self {
        Self { feed: Arc::clone(&s.feed) }
    }
}

impl FromRef<ApiServices> for AuthState {
    fn from_ref(s: &ApiServices) -> Self {
        s.auth.clone()
    }
}

/// HTTP-level settings that do not belong to any service.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Exact origin to allow; `None` allows any.
    pub cors_origin: Option<String>,
    /// Directory served under `/articleImages`.
    pub upload_dir: PathBuf,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/auth/user-login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::get_user,
        auth::update_profile,
        auth::change_password,
        // Categories
        categories::fetch_categories,
        categories::create_category,
        categories::edit_category,
        // Articles
        articles::create_article,
        articles::update_article,
        articles::delete_article,
        articles::fetch_all_articles,
        articles::fetch_articles_by_category,
        articles::get_user_articles,
        articles::get_article_by_id,
        feed::get_feed,
        // Engagement
        engagement::like_article,
        engagement::dislike_article,
        engagement::block_article,
    ),
    components(
        schemas(
            ApiResponse<EmptyData>,
            EmptyData,
            health::HealthResponse,
            health::CheckResult,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::UserProfileDto,
            auth::UpdateProfileRequest,
            auth::ChangePasswordRequest,
            categories::CategoryDto,
            categories::CategoryNameRequest,
            articles::ArticleDto,
            articles::ArticleForm,
            engagement::EngagementDto,
            feed::FeedDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Authentication", description = "Registration, login (JWT), profile and password"),
        (name = "Categories", description = "Category registry"),
        (name = "Articles", description = "Article publishing, listings and the personalised feed"),
        (name = "Engagement", description = "Like, dislike and block toggles"),
    ),
    info(
        title = "ReadRealm API",
        version = "1.0.0",
        description = "Article publishing and engagement platform",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(_)) => {
            warn!(?origin, "Invalid CORS origin, allowing any");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the API router with all routes
pub fn create_api_router(
    services: ApiServices,
    db: DatabaseConnection,
    config: &RouterConfig,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let auth_layer = || middleware::from_fn_with_state(services.auth.clone(), auth_middleware);
    let optional_layer =
        || middleware::from_fn_with_state(services.auth.clone(), optional_auth_middleware);

    // Auth routes
    let auth_public = Router::new()
        .route("/user-register", post(auth::register))
        .route("/user-login", post(auth::login))
        .route("/user-logout", post(auth::logout));

    let auth_protected = Router::new()
        .route("/getUser/{user_id}", get(auth::get_user))
        .route("/profile", put(auth::update_profile))
        .route("/change-password", put(auth::change_password))
        .route_layer(auth_layer());

    // Article routes (protected)
    let article_protected = Router::new()
        .route("/fetchCategories", get(categories::fetch_categories))
        .route("/createCategories", post(categories::create_category))
        .route("/editCategory/{category_id}", put(categories::edit_category))
        .route("/createArticles", post(articles::create_article))
        .route(
            "/fetchArticlesByCategory/{category_id}",
            get(articles::fetch_articles_by_category),
        )
        .route("/updateArticle/{article_id}", put(articles::update_article))
        .route("/deleteArticle/{article_id}", delete(articles::delete_article))
        .route("/like/{user_id}/{article_id}", put(engagement::like_article))
        .route("/dislike/{user_id}/{article_id}", put(engagement::dislike_article))
        .route("/block/{user_id}/{article_id}", put(engagement::block_article))
        .route_layer(auth_layer());

    // Article routes (anonymous viewers allowed)
    let article_optional = Router::new()
        .route("/fetchAllArticles", get(articles::fetch_all_articles))
        .route("/getUserArticles/{user_id}", get(articles::get_user_articles))
        .route("/getArticleById/{article_id}", get(articles::get_article_by_id))
        .route("/feed", get(feed::get_feed))
        .route_layer(optional_layer());

    let api_routes = Router::new()
        .nest("/auth", auth_public.merge(auth_protected))
        .nest("/article", article_protected.merge(article_optional))
        .with_state(services);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db,
            upload_dir: config.upload_dir.clone(),
            started_at: Arc::new(Instant::now()),
        });

    let mut router = Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .nest_service("/articleImages", ServeDir::new(&config.upload_dir))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors_layer(config.cors_origin.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::infrastructure::uploads::{LocalImageStore, UploadConfig};
    use crate::test_support::{test_db, test_repos};

    const BOUNDARY: &str = "readrealm-test-boundary";

    struct TestApp {
        router: Router,
        _uploads: tempfile::TempDir,
    }

    async fn test_app() -> TestApp {
        let db = test_db().await;
        let uploads = tempfile::tempdir().unwrap();
        let upload_config = UploadConfig {
            dir: uploads.path().to_path_buf(),
            max_bytes: 64 * 1024,
        };
        let store = LocalImageStore::init(upload_config.clone()).await.unwrap();
        let jwt = JwtConfig {
            secret: "router-test-secret".into(),
            expiration_hours: 1,
            issuer: "readrealm".into(),
        };
        let services = ApiServices::new(test_repos(&db), jwt, Arc::new(store));
        let config = RouterConfig {
            cors_origin: None,
            upload_dir: upload_config.dir,
            max_body_bytes: 256 * 1024,
        };
        TestApp {
            router: create_api_router(services, db, &config, None),
            _uploads: uploads,
        }
    }

    impl TestApp {
        async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
            let resp = self.router.clone().oneshot(req).await.unwrap();
            let status = resp.status();
            let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, body)
        }

        async fn json(&self, method: Method, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
            let mut req = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json");
            if let Some(token) = token {
                req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            self.send(req.body(Body::from(body.to_string())).unwrap()).await
        }

        async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
            let mut req = Request::builder().uri(uri);
            if let Some(token) = token {
                req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            self.send(req.body(Body::empty()).unwrap()).await
        }

        async fn multipart(&self, method: Method, uri: &str, token: &str, body: Vec<u8>) -> (StatusCode, Value) {
            let req = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap();
            self.send(req).await
        }

        /// Registers and logs in; returns `(token, user_id)`.
        async fn sign_up(&self, email: &str, phone: &str, preferences: &[&str]) -> (String, String) {
            let (status, _) = self
                .json(
                    Method::POST,
                    "/api/auth/user-register",
                    None,
                    json!({
                        "firstName": "Ada",
                        "lastName": "Lovelace",
                        "phone": phone,
                        "email": email,
                        "dob": "1990-12-10",
                        "password": "secret123",
                        "preferences": preferences,
                    }),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);

            let (status, body) = self
                .json(
                    Method::POST,
                    "/api/auth/user-login",
                    None,
                    json!({ "emailOrPhone": email, "password": "secret123" }),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            (
                body["data"]["token"].as_str().unwrap().to_string(),
                body["data"]["userData"]["id"].as_str().unwrap().to_string(),
            )
        }

        async fn create_category(&self, token: &str, name: &str) -> String {
            let (status, body) = self
                .json(Method::POST, "/api/article/createCategories", Some(token), json!({ "name": name }))
                .await;
            assert_eq!(status, StatusCode::CREATED);
            body["data"]["id"].as_str().unwrap().to_string()
        }

        async fn create_article(&self, token: &str, category_id: &str, title: &str) -> Value {
            let form = article_form(&[("title", title), ("description", "body"), ("category", category_id)], true);
            let (status, body) = self
                .multipart(Method::POST, "/api/article/createArticles", token, form)
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body["data"].clone()
        }
    }

    fn article_form(fields: &[(&str, &str)], with_image: bool) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, value) in fields {
            out.extend_from_slice(
                format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                    .as_bytes(),
            );
        }
        if with_image {
            out.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"cover.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            out.extend_from_slice(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a]);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        out
    }

    #[tokio::test]
    async fn register_login_and_profile() {
        let app = test_app().await;
        let (token, user_id) = app.sign_up("ada@example.com", "555-0100", &[]).await;

        let (status, body) = app.get(&format!("/api/auth/getUser/{user_id}"), Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["email"], "ada@example.com");
        assert!(body["data"].get("passwordHash").is_none());

        let (status, body) = app
            .json(
                Method::POST,
                "/api/auth/user-login",
                None,
                json!({ "emailOrPhone": "555-0100", "password": "wrong-pass" }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let app = test_app().await;
        app.sign_up("ada@example.com", "555-0100", &[]).await;

        let (status, body) = app
            .json(
                Method::POST,
                "/api/auth/user-register",
                None,
                json!({
                    "firstName": "Other",
                    "lastName": "Person",
                    "phone": "555-0100",
                    "email": "other@example.com",
                    "dob": "1991-01-01",
                    "password": "secret123",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn tampered_token_is_unauthorized() {
        let app = test_app().await;
        let (token, _) = app.sign_up("ada@example.com", "555-0100", &[]).await;

        let (status, _) = app.get("/api/article/fetchCategories", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let tampered = format!("{token}x");
        let (status, body) = app.get("/api/article/fetchCategories", Some(&tampered)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        // optional-auth routes still reject a bad token
        let (status, _) = app.get("/api/article/fetchAllArticles", Some(&tampered)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = app.get("/api/article/fetchAllArticles", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn article_lifecycle_with_image() {
        let app = test_app().await;
        let (token, user_id) = app.sign_up("ada@example.com", "555-0100", &[]).await;
        let category_id = app.create_category(&token, "Science").await;

        let article = app.create_article(&token, &category_id, "Orbits").await;
        assert_eq!(article["createdBy"], user_id.as_str());
        assert_eq!(article["category"], category_id.as_str());
        let image_url = article["imageUrl"].as_str().unwrap().to_string();
        assert!(image_url.starts_with("/articleImages/"));

        let resp = app
            .router
            .clone()
            .oneshot(Request::builder().uri(&image_url).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let by_category = format!("/api/article/fetchArticlesByCategory/{category_id}");
        let (status, body) = app.get(&by_category, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let article_id = article["id"].as_str().unwrap();
        let (status, body) = app.get(&format!("/api/article/getArticleById/{article_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "Orbits");

        let req = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/article/deleteArticle/{article_id}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = app.send(req).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app.get(&by_category, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());

        let (status, _) = app.get(&format!("/api/article/getArticleById/{article_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_with_unknown_category_is_not_found() {
        let app = test_app().await;
        let (token, _) = app.sign_up("ada@example.com", "555-0100", &[]).await;
        let form = article_form(&[("title", "T"), ("description", "D"), ("category", "missing")], false);
        let (status, body) = app
            .multipart(Method::POST, "/api/article/createArticles", &token, form)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Category not found");
    }

    #[tokio::test]
    async fn only_the_author_may_edit() {
        let app = test_app().await;
        let (author_token, _) = app.sign_up("ada@example.com", "555-0100", &[]).await;
        let (other_token, _) = app.sign_up("bob@example.com", "555-0101", &[]).await;
        let category_id = app.create_category(&author_token, "Science").await;
        let article = app.create_article(&author_token, &category_id, "Orbits").await;
        let uri = format!("/api/article/updateArticle/{}", article["id"].as_str().unwrap());

        let form = article_form(&[("title", "Hijacked")], false);
        let (status, _) = app.multipart(Method::PUT, &uri, &other_token, form).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let form = article_form(&[("title", "Orbits, revised"), ("description", "")], false);
        let (status, body) = app.multipart(Method::PUT, &uri, &author_token, form).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "Orbits, revised");
        assert_eq!(body["data"]["description"], "body");
    }

    #[tokio::test]
    async fn engagement_acts_only_for_the_caller() {
        let app = test_app().await;
        let (token, user_id) = app.sign_up("ada@example.com", "555-0100", &[]).await;
        let (_, other_id) = app.sign_up("bob@example.com", "555-0101", &[]).await;
        let category_id = app.create_category(&token, "Science").await;
        let article = app.create_article(&token, &category_id, "Orbits").await;
        let article_id = article["id"].as_str().unwrap();

        let (status, _) = app
            .json(Method::PUT, &format!("/api/article/like/{other_id}/{article_id}"), Some(&token), json!({}))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let like_uri = format!("/api/article/like/{user_id}/{article_id}");
        let (status, body) = app.json(Method::PUT, &like_uri, Some(&token), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Article liked successfully");
        assert_eq!(body["data"]["article"]["likeCount"], 1);

        let (_, body) = app.json(Method::PUT, &like_uri, Some(&token), json!({})).await;
        assert_eq!(body["data"]["action"], "unliked");
        assert_eq!(body["data"]["article"]["likeCount"], 0);
    }

    #[tokio::test]
    async fn feed_reports_empty_preferences_and_hides_blocked() {
        let app = test_app().await;
        let (admin_token, _) = app.sign_up("admin@example.com", "555-0001", &[]).await;
        let science = app.create_category(&admin_token, "Science").await;
        let history = app.create_category(&admin_token, "History").await;

        let (reader_token, reader_id) = app.sign_up("ada@example.com", "555-0100", &[&science]).await;

        let (status, body) = app.get("/api/article/feed", Some(&reader_token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["kind"], "empty_preferred");
        assert_eq!(body["message"], "No articles found in your preferred categories");

        let article = app.create_article(&admin_token, &science, "Orbits").await;
        app.create_article(&admin_token, &history, "Rome").await;

        let (_, body) = app.get("/api/article/feed", Some(&reader_token)).await;
        assert_eq!(body["data"]["kind"], "preferred");
        assert_eq!(body["data"]["articles"].as_array().unwrap().len(), 1);

        let block_uri = format!("/api/article/block/{reader_id}/{}", article["id"].as_str().unwrap());
        let (status, _) = app.json(Method::PUT, &block_uri, Some(&reader_token), json!({})).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = app.get("/api/article/feed", Some(&reader_token)).await;
        assert_eq!(body["data"]["kind"], "preferred");
        assert!(body["data"]["articles"].as_array().unwrap().is_empty());

        let (_, body) = app.get("/api/article/feed", None).await;
        assert_eq!(body["data"]["kind"], "all");
        assert_eq!(body["data"]["articles"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn health_reports_both_checks() {
        let app = test_app().await;
        let (status, body) = app.get("/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"]["healthy"], true);
        assert_eq!(body["imageStore"]["healthy"], true);
    }

    #[tokio::test]
    async fn serves_openapi_document() {
        let app = test_app().await;
        let (status, body) = app.get("/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/api/article/createArticles").is_some());
    }
}
