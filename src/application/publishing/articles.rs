//! Article use-cases: create, edit, delete and the read projections.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ports::{ImageStore, ImageUpload};
use crate::domain::article::parse_tags;
use crate::domain::{
    Article, ArticleChanges, ArticleFilter, DomainError, DomainResult, NewArticle,
    RepositoryProvider,
};

/// Fields submitted to create an article. `tags` is the raw client string.
#[derive(Debug, Clone, Default)]
pub struct ArticleDraft {
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub tags: Option<String>,
    pub image: Option<ImageUpload>,
}

/// Partial edit. Blank text fields count as omitted.
#[derive(Debug, Clone, Default)]
pub struct ArticleEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub tags: Option<String>,
    pub image: Option<ImageUpload>,
}

pub struct ArticleService {
    repos: Arc<dyn RepositoryProvider>,
    images: Arc<dyn ImageStore>,
}

impl ArticleService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, images: Arc<dyn ImageStore>) -> Self {
        Self { repos, images }
    }

    pub async fn create(&self, author_id: &str, draft: ArticleDraft) -> DomainResult<Article> {
        let title = required("Title", &draft.title)?;
        let description = required("Description", &draft.description)?;
        let category_id = required("Category", &draft.category_id)?;
        self.ensure_category(&category_id).await?;

        let image = match draft.image {
            Some(upload) => Some(self.images.save(upload).await?),
            None => None,
        };

        let result = self
            .repos
            .articles()
            .create(NewArticle {
                title,
                description,
                image: image.clone(),
                tags: draft.tags.as_deref().map(parse_tags).unwrap_or_default(),
                category_id,
                author_id: author_id.to_string(),
            })
            .await;

        match result {
            Ok(article) => {
                info!(article_id = %article.id, author_id, "Article created");
                Ok(article)
            }
            Err(e) => {
                if let Some(name) = image {
                    self.images.remove(&name).await;
                }
                Err(e)
            }
        }
    }

    /// Author only. Omitted fields keep their stored value.
    pub async fn edit(&self, actor_id: &str, article_id: &str, edit: ArticleEdit) -> DomainResult<Article> {
        let existing = self.owned_article(actor_id, article_id, "edit").await?;

        let category_id = non_blank(edit.category_id);
        if let Some(id) = &category_id {
            self.ensure_category(id).await?;
        }

        let new_image = match edit.image {
            Some(upload) => Some(self.images.save(upload).await?),
            None => None,
        };

        let changes = ArticleChanges {
            title: non_blank(edit.title),
            description: non_blank(edit.description),
            image: new_image.clone(),
            tags: edit.tags.as_deref().map(parse_tags),
            category_id,
        };

        let updated = match self.repos.articles().update(article_id, changes).await {
            Ok(Some(article)) => article,
            Ok(None) => {
                self.discard(new_image).await;
                return Err(DomainError::not_found("Article", article_id));
            }
            Err(e) => {
                self.discard(new_image).await;
                return Err(e);
            }
        };

        if new_image.is_some() {
            self.discard(existing.image).await;
        }

        info!(article_id, "Article updated");
        Ok(updated)
    }

    /// Author only. Engagement rows go with the article.
    pub async fn delete(&self, actor_id: &str, article_id: &str) -> DomainResult<()> {
        let existing = self.owned_article(actor_id, article_id, "delete").await?;

        if !self.repos.articles().delete(article_id).await? {
            return Err(DomainError::not_found("Article", article_id));
        }
        self.discard(existing.image).await;

        info!(article_id, "Article deleted");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Returned even when the viewer has blocked it, so they can unblock.
    pub async fn get(&self, article_id: &str) -> DomainResult<Article> {
        self.repos
            .articles()
            .find_by_id(article_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Article", article_id))
    }

    pub async fn list_all(&self, viewer: Option<&str>) -> DomainResult<Vec<Article>> {
        self.repos
            .articles()
            .find(ArticleFilter::all().hiding_blocked_for(viewer))
            .await
    }

    pub async fn list_by_category(&self, category_id: &str, viewer: Option<&str>) -> DomainResult<Vec<Article>> {
        self.repos
            .articles()
            .find(ArticleFilter::in_categories(vec![category_id.to_string()]).hiding_blocked_for(viewer))
            .await
    }

    pub async fn list_by_author(&self, author_id: &str, viewer: Option<&str>) -> DomainResult<Vec<Article>> {
        self.repos
            .articles()
            .find(ArticleFilter::by_author(author_id).hiding_blocked_for(viewer))
            .await
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn owned_article(&self, actor_id: &str, article_id: &str, verb: &str) -> DomainResult<Article> {
        let article = self.get(article_id).await?;
        if !article.is_authored_by(actor_id) {
            warn!(article_id, actor_id, "Rejected {} by non-author", verb);
            return Err(DomainError::Forbidden(format!(
                "Only the author can {} this article",
                verb
            )));
        }
        Ok(article)
    }

    async fn ensure_category(&self, id: &str) -> DomainResult<()> {
        if self.repos.categories().find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Category", id));
        }
        Ok(())
    }

    async fn discard(&self, image: Option<String>) {
        if let Some(name) = image {
            self.images.remove(&name).await;
        }
    }
}

fn required(field: &str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
