//! Reads the multipart article form.

use axum::extract::multipart::{Field, Multipart};

use crate::application::ports::ImageUpload;
use crate::application::publishing::{ArticleDraft, ArticleEdit};
use crate::domain::DomainError;
use crate::interfaces::http::common::ApiError;

/// Raw parts as sent. Unknown parts are ignored.
#[derive(Debug, Default)]
pub struct ArticleParts {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub image: Option<ImageUpload>,
}

impl ArticleParts {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut parts = ArticleParts::default();

        while let Some(field) = multipart.next_field().await.map_err(form_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match name.as_str() {
                "title" => parts.title = Some(text(field).await?),
                "description" => parts.description = Some(text(field).await?),
                "category" | "categoryId" => parts.category = Some(text(field).await?),
                "tags" => parts.tags = Some(text(field).await?),
                "image" => parts.image = file(field).await?,
                _ => {}
            }
        }

        Ok(parts)
    }

    pub fn into_draft(self) -> ArticleDraft {
        ArticleDraft {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            category_id: self.category.unwrap_or_default(),
            tags: self.tags,
            image: self.image,
        }
    }

    pub fn into_edit(self) -> ArticleEdit {
        ArticleEdit {
            title: self.title,
            description: self.description,
            category_id: self.category,
            tags: self.tags.filter(|t| !t.trim().is_empty()),
            image: self.image,
        }
    }
}

async fn text(field: Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(form_error)
}

/// An empty file part (no file chosen in the browser) counts as no image.
async fn file(field: Field<'_>) -> Result<Option<ImageUpload>, ApiError> {
    let content_type = field
        .content_type()
        .map(str::to_string)
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let original_name = field.file_name().map(str::to_string);
    let bytes = field.bytes().await.map_err(form_error)?;

    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(ImageUpload {
        content_type,
        original_name,
        bytes: bytes.to_vec(),
    }))
}

fn form_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    DomainError::Validation(format!("Invalid form data: {}", e.body_text())).into()
}
