use async_trait::async_trait;

use super::{Article, ArticleChanges, ArticleFilter, NewArticle};
use crate::domain::DomainResult;

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn create(&self, article: NewArticle) -> DomainResult<Article>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Article>>;
    /// Matching articles, newest first.
    async fn find(&self, filter: ArticleFilter) -> DomainResult<Vec<Article>>;
    async fn update(&self, id: &str, changes: ArticleChanges) -> DomainResult<Option<Article>>;
    /// Returns `false` when no article had that id.
    async fn delete(&self, id: &str) -> DomainResult<bool>;
}
