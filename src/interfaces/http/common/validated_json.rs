//! JSON body extractor that also runs `validator` rules.
//!
//! Both malformed bodies and rule violations come back as
//! `DomainError::Validation`, so clients always see a 400 envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiError;
use crate::domain::DomainError;

/// `Json<T>` plus `Validate::validate()`.
///
/// ```ignore
/// async fn create(ValidatedJson(body): ValidatedJson<CategoryNameRequest>) { /* body passed validation */ }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(malformed)?;
        value.validate().map_err(invalid)?;
        Ok(ValidatedJson(value))
    }
}

fn malformed(rejection: JsonRejection) -> ApiError {
    ApiError(DomainError::Validation(format!("Invalid request body: {}", rejection.body_text())))
}

/// Joins field messages as `field: message`, ordered by field name.
fn invalid(errors: ValidationErrors) -> ApiError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();

    let message = if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    };
    ApiError(DomainError::Validation(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(length(min = 1, message = "first name is required"))]
        first_name: String,
        #[validate(email(message = "invalid email format"))]
        email: String,
    }

    async fn accept(ValidatedJson(body): ValidatedJson<Signup>) -> String {
        body.first_name
    }

    async fn post_raw(raw: &str) -> (StatusCode, Value) {
        let app = Router::new().route("/signup", post(accept));
        let req = Request::builder()
            .method("POST")
            .uri("/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn passes_valid_body_through() {
        let (status, _) = post_raw(&json!({"first_name": "Ada", "email": "ada@example.com"}).to_string()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let (status, body) = post_raw("{\"first_name\": ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn lists_every_failed_field() {
        let (status, body) = post_raw(&json!({"first_name": "", "email": "nope"}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "email: invalid email format; first_name: first name is required"
        );
    }
}
