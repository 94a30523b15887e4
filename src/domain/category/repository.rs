use async_trait::async_trait;

use super::Category;
use crate::domain::DomainResult;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, name: &str) -> DomainResult<Category>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Category>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Category>>;
    /// Categories whose id is in `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Category>>;
    /// All categories, newest first.
    async fn find_all(&self) -> DomainResult<Vec<Category>>;
    async fn rename(&self, id: &str, name: &str) -> DomainResult<Option<Category>>;
}
