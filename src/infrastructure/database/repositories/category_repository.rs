use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{Category, CategoryRepository, DomainError, DomainResult};
use crate::infrastructure::database::entities::category;

pub struct SeaOrmCategoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn category_model_to_domain(model: category::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn map_write_err(name: &str, e: sea_orm::DbErr) -> DomainError {
    let msg = e.to_string();
    if msg.contains("UNIQUE") || msg.contains("duplicate") {
        DomainError::DuplicateCategory(name.to_string())
    } else {
        e.into()
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn create(&self, name: &str) -> DomainResult<Category> {
        let now = Utc::now();
        let model = category::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_write_err(name, e))?;

        Ok(category_model_to_domain(model))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Category>> {
        let model = category::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(category_model_to_domain))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Category>> {
        let model = category::Entity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(model.map(category_model_to_domain))
    }

    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = category::Entity::find()
            .filter(category::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(category_model_to_domain).collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_desc(category::Column::CreatedAt)
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(category_model_to_domain).collect())
    }

    async fn rename(&self, id: &str, name: &str) -> DomainResult<Option<Category>> {
        let Some(existing) = category::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: category::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(Utc::now());
        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| map_write_err(name, e))?;

        Ok(Some(category_model_to_domain(updated)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let repo = SeaOrmCategoryRepository::new(test_db().await);
        repo.create("Tech").await.unwrap();
        let err = repo.create("Tech").await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateCategory(name) if name == "Tech"));
    }

    #[tokio::test]
    async fn find_by_ids_skips_unknown() {
        let repo = SeaOrmCategoryRepository::new(test_db().await);
        let tech = repo.create("Tech").await.unwrap();
        repo.create("Art").await.unwrap();

        let found = repo
            .find_by_ids(&[tech.id.clone(), "missing".into()])
            .await
            .unwrap();
        assert_eq!(found, vec![tech]);
        assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rename_refreshes_updated_at() {
        let repo = SeaOrmCategoryRepository::new(test_db().await);
        let tech = repo.create("Tech").await.unwrap();

        let renamed = repo.rename(&tech.id, "Technology").await.unwrap().unwrap();
        assert_eq!(renamed.name, "Technology");
        assert!(renamed.updated_at >= tech.updated_at);
        assert!(repo.rename("missing", "x").await.unwrap().is_none());
    }
}
