//! Reaction and block toggles.
//!
//! Each toggle is one transaction on the single (article, user) row and
//! starts with a write, so it holds the SQLite write lock from its first
//! statement. Concurrent toggles queue on that lock instead of failing a
//! read-to-write upgrade, and the upsert keeps a repeated request for the
//! same pair from tripping the primary key.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::debug;

use crate::domain::engagement::{toggle_block, toggle_reaction};
use crate::domain::{DomainError, DomainResult, EngagementAction, EngagementRepository, Reaction};
use crate::infrastructure::database::entities::article_reaction::ReactionKind;
use crate::infrastructure::database::entities::{article, article_block, article_reaction};

pub struct SeaOrmEngagementRepository {
    db: DatabaseConnection,
}

impl SeaOrmEngagementRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<ReactionKind> for Reaction {
    fn from(kind: ReactionKind) -> Self {
        match kind {
            ReactionKind::Like => Reaction::Like,
            ReactionKind::Dislike => Reaction::Dislike,
        }
    }
}

impl From<Reaction> for ReactionKind {
    fn from(reaction: Reaction) -> Self {
        match reaction {
            Reaction::Like => ReactionKind::Like,
            Reaction::Dislike => ReactionKind::Dislike,
        }
    }
}

async fn ensure_article<C: ConnectionTrait>(db: &C, article_id: &str) -> DomainResult<()> {
    match article::Entity::find_by_id(article_id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(DomainError::not_found("Article", article_id)),
    }
}

#[async_trait]
impl EngagementRepository for SeaOrmEngagementRepository {
    async fn toggle_reaction(
        &self,
        article_id: &str,
        user_id: &str,
        requested: Reaction,
    ) -> DomainResult<EngagementAction> {
        let txn = self.db.begin().await?;

        // Removing the same reaction is the "un-" toggle; a row left in
        // place is the opposite reaction and gets overwritten below.
        let removed = article_reaction::Entity::delete_many()
            .filter(article_reaction::Column::ArticleId.eq(article_id))
            .filter(article_reaction::Column::UserId.eq(user_id))
            .filter(article_reaction::Column::Kind.eq(ReactionKind::from(requested)))
            .exec(&txn)
            .await?
            .rows_affected;

        let transition = toggle_reaction((removed > 0).then_some(requested), requested);

        if let Some(next) = transition.next {
            ensure_article(&txn, article_id).await?;
            article_reaction::Entity::insert(article_reaction::ActiveModel {
                article_id: Set(article_id.to_string()),
                user_id: Set(user_id.to_string()),
                kind: Set(next.into()),
                created_at: Set(Utc::now()),
            })
            .on_conflict(
                OnConflict::columns([
                    article_reaction::Column::ArticleId,
                    article_reaction::Column::UserId,
                ])
                .update_columns([article_reaction::Column::Kind, article_reaction::Column::CreatedAt])
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
        }

        txn.commit().await?;
        debug!(article_id, user_id, action = %transition.action, "Reaction toggled");
        Ok(transition.action)
    }

    async fn toggle_block(&self, article_id: &str, user_id: &str) -> DomainResult<EngagementAction> {
        let txn = self.db.begin().await?;

        let removed = article_block::Entity::delete_many()
            .filter(article_block::Column::ArticleId.eq(article_id))
            .filter(article_block::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?
            .rows_affected;

        let (blocked, action) = toggle_block(removed > 0);
        if blocked {
            ensure_article(&txn, article_id).await?;
            article_block::Entity::insert(article_block::ActiveModel {
                article_id: Set(article_id.to_string()),
                user_id: Set(user_id.to_string()),
                created_at: Set(Utc::now()),
            })
            .on_conflict(
                OnConflict::columns([article_block::Column::ArticleId, article_block::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
        }

        txn.commit().await?;
        debug!(article_id, user_id, action = %action, "Block toggled");
        Ok(action)
    }
}
