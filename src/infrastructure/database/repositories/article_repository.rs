use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::warn;

use crate::domain::article::sort_newest_first;
use crate::domain::{
    Article, ArticleChanges, ArticleFilter, ArticleRepository, DomainResult, NewArticle,
};
use crate::infrastructure::database::entities::{article, article_block, article_reaction};
use crate::infrastructure::database::entities::article_reaction::ReactionKind;
use crate::shared::InfraError;

pub struct SeaOrmArticleRepository {
    db: DatabaseConnection,
}

impl SeaOrmArticleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Default)]
struct EngagementSets {
    likes: BTreeSet<String>,
    dislikes: BTreeSet<String>,
    blocked_by: BTreeSet<String>,
}

fn encode_tags(tags: &[String]) -> DomainResult<String> {
    serde_json::to_string(tags).map_err(|e| InfraError::from(e).into())
}

fn article_model_to_domain(model: article::Model, sets: EngagementSets) -> Article {
    let tags = serde_json::from_str(&model.tags).unwrap_or_else(|e| {
        warn!(article_id = %model.id, error = %e, "Unreadable tags column, treating as empty");
        Vec::new()
    });

    Article {
        id: model.id,
        title: model.title,
        description: model.description,
        image: model.image,
        tags,
        category_id: model.category_id,
        author_id: model.author_id,
        likes: sets.likes,
        dislikes: sets.dislikes,
        blocked_by: sets.blocked_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Loads the engagement rows for `models` and assembles domain articles,
/// preserving the input order.
async fn hydrate<C: ConnectionTrait>(db: &C, models: Vec<article::Model>) -> DomainResult<Vec<Article>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
    let mut sets: HashMap<String, EngagementSets> = HashMap::new();

    let reactions = article_reaction::Entity::find()
        .filter(article_reaction::Column::ArticleId.is_in(ids.clone()))
        .all(db)
        .await?;
    for r in reactions {
        let entry = sets.entry(r.article_id).or_default();
        match r.kind {
            ReactionKind::Like => entry.likes.insert(r.user_id),
            ReactionKind::Dislike => entry.dislikes.insert(r.user_id),
        };
    }

    let blocks = article_block::Entity::find()
        .filter(article_block::Column::ArticleId.is_in(ids))
        .all(db)
        .await?;
    for b in blocks {
        sets.entry(b.article_id).or_default().blocked_by.insert(b.user_id);
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let s = sets.remove(&m.id).unwrap_or_default();
            article_model_to_domain(m, s)
        })
        .collect())
}

pub(crate) async fn find_article<C: ConnectionTrait>(db: &C, id: &str) -> DomainResult<Option<Article>> {
    let Some(model) = article::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    Ok(hydrate(db, vec![model]).await?.pop())
}

#[async_trait]
impl ArticleRepository for SeaOrmArticleRepository {
    async fn create(&self, new: NewArticle) -> DomainResult<Article> {
        let now = Utc::now();
        let model = article::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            title: Set(new.title),
            description: Set(new.description),
            image: Set(new.image),
            tags: Set(encode_tags(&new.tags)?),
            category_id: Set(new.category_id),
            author_id: Set(new.author_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(article_model_to_domain(model, EngagementSets::default()))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Article>> {
        find_article(&self.db, id).await
    }

    async fn find(&self, filter: ArticleFilter) -> DomainResult<Vec<Article>> {
        let mut query = article::Entity::find();

        if let Some(category_ids) = filter.category_ids {
            if category_ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(article::Column::CategoryId.is_in(category_ids));
        }

        if let Some(author_id) = filter.author_id {
            query = query.filter(article::Column::AuthorId.eq(author_id));
        }

        if let Some(viewer) = filter.exclude_blocked_for {
            query = query.filter(
                article::Column::Id.not_in_subquery(
                    Query::select()
                        .column(article_block::Column::ArticleId)
                        .from(article_block::Entity)
                        .and_where(article_block::Column::UserId.eq(viewer))
                        .to_owned(),
                ),
            );
        }

        let models = query
            .order_by_desc(article::Column::CreatedAt)
            .order_by_desc(article::Column::Id)
            .all(&self.db)
            .await?;

        let mut articles = hydrate(&self.db, models).await?;
        // Timestamps round-trip through text in SQLite; re-sort on the parsed values.
        sort_newest_first(&mut articles);
        Ok(articles)
    }

    async fn update(&self, id: &str, changes: ArticleChanges) -> DomainResult<Option<Article>> {
        let Some(existing) = article::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: article::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(image) = changes.image {
            active.image = Set(Some(image));
        }
        if let Some(tags) = changes.tags {
            active.tags = Set(encode_tags(&tags)?);
        }
        if let Some(category_id) = changes.category_id {
            active.category_id = Set(category_id);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await?;
        Ok(hydrate(&self.db, vec![updated]).await?.pop())
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let txn = self.db.begin().await?;

        article_reaction::Entity::delete_many()
            .filter(article_reaction::Column::ArticleId.eq(id))
            .exec(&txn)
            .await?;
        article_block::Entity::delete_many()
            .filter(article_block::Column::ArticleId.eq(id))
            .exec(&txn)
            .await?;
        let result = article::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}
