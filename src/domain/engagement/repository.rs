use async_trait::async_trait;

use super::{EngagementAction, Reaction};
use crate::domain::DomainResult;

/// Atomic per-(article, user) engagement updates.
///
/// Implementations must apply each toggle as one unit so that concurrent
/// toggles from different users on the same article never overwrite each
/// other. A missing article is reported as `DomainError::NotFound`.
#[async_trait]
pub trait EngagementRepository: Send + Sync {
    async fn toggle_reaction(
        &self,
        article_id: &str,
        user_id: &str,
        requested: Reaction,
    ) -> DomainResult<EngagementAction>;

    async fn toggle_block(&self, article_id: &str, user_id: &str) -> DomainResult<EngagementAction>;
}
