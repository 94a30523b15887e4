use std::sync::Arc;

use tracing::info;

use crate::domain::category::normalize_name;
use crate::domain::{Category, DomainError, DomainResult, RepositoryProvider};

/// Category registry. Any authenticated user may create or rename.
pub struct CategoryService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CategoryService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create(&self, name: &str) -> DomainResult<Category> {
        let name = valid_name(name)?;
        if self.repos.categories().find_by_name(&name).await?.is_some() {
            return Err(DomainError::DuplicateCategory(name));
        }

        let category = self.repos.categories().create(&name).await?;
        info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Newest first.
    pub async fn list(&self) -> DomainResult<Vec<Category>> {
        self.repos.categories().find_all().await
    }

    pub async fn rename(&self, id: &str, name: &str) -> DomainResult<Category> {
        let name = valid_name(name)?;
        let categories = self.repos.categories();

        if categories.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Category", id));
        }
        if let Some(other) = categories.find_by_name(&name).await? {
            if other.id != id {
                return Err(DomainError::DuplicateCategory(name));
            }
        }

        let category = categories
            .rename(id, &name)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))?;
        info!(category_id = %category.id, name = %category.name, "Category renamed");
        Ok(category)
    }
}

fn valid_name(name: &str) -> DomainResult<String> {
    let name = normalize_name(name);
    if name.is_empty() {
        return Err(DomainError::Validation("Category name is required".into()));
    }
    Ok(name)
}
