use std::sync::Arc;

use tracing::info;

use crate::domain::{Article, DomainError, DomainResult, EngagementAction, Reaction, RepositoryProvider};

/// Result of a toggle: what happened plus the article as it now stands.
#[derive(Debug, Clone)]
pub struct EngagementOutcome {
    pub action: EngagementAction,
    pub article: Article,
}

pub struct EngagementService {
    repos: Arc<dyn RepositoryProvider>,
}

impl EngagementService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// `actor_id` is the authenticated user; `user_id` is the one named in
    /// the request. They must match.
    pub async fn like(&self, actor_id: &str, user_id: &str, article_id: &str) -> DomainResult<EngagementOutcome> {
        self.react(actor_id, user_id, article_id, Reaction::Like).await
    }

    pub async fn dislike(&self, actor_id: &str, user_id: &str, article_id: &str) -> DomainResult<EngagementOutcome> {
        self.react(actor_id, user_id, article_id, Reaction::Dislike).await
    }

    pub async fn block(&self, actor_id: &str, user_id: &str, article_id: &str) -> DomainResult<EngagementOutcome> {
        ensure_self(actor_id, user_id)?;
        let action = self.repos.engagement().toggle_block(article_id, user_id).await?;
        self.finish(article_id, user_id, action).await
    }

    async fn react(
        &self,
        actor_id: &str,
        user_id: &str,
        article_id: &str,
        reaction: Reaction,
    ) -> DomainResult<EngagementOutcome> {
        ensure_self(actor_id, user_id)?;
        let action = self
            .repos
            .engagement()
            .toggle_reaction(article_id, user_id, reaction)
            .await?;
        self.finish(article_id, user_id, action).await
    }

    async fn finish(&self, article_id: &str, user_id: &str, action: EngagementAction) -> DomainResult<EngagementOutcome> {
        metrics::counter!("article_engagement_total", "action" => action.as_str()).increment(1);
        info!(article_id, user_id, action = %action, "Engagement toggled");

        let article = self
            .repos
            .articles()
            .find_by_id(article_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Article", article_id))?;
        Ok(EngagementOutcome { action, article })
    }
}

fn ensure_self(actor_id: &str, user_id: &str) -> DomainResult<()> {
    if actor_id != user_id {
        return Err(DomainError::Forbidden("Cannot act on behalf of another user".into()));
    }
    Ok(())
}
