//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::article::ArticleRepository;
use super::category::CategoryRepository;
use super::engagement::EngagementRepository;
use super::user::UserRepository;
use crate::shared::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let article = repos.articles().find_by_id("…").await?;
///     let action = repos.engagement().toggle_block("…", "…").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn categories(&self) -> &dyn CategoryRepository;
    fn articles(&self) -> &dyn ArticleRepository;
    fn engagement(&self) -> &dyn EngagementRepository;
}
