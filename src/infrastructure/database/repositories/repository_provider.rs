//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::{ArticleRepository, CategoryRepository, EngagementRepository, UserRepository};

use super::article_repository::SeaOrmArticleRepository;
use super::category_repository::SeaOrmCategoryRepository;
use super::engagement_repository::SeaOrmEngagementRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let user = repos.users().get_user_by_email("reader@example.com").await?;
/// let action = repos.engagement().toggle_block(&article_id, &user.id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    categories: SeaOrmCategoryRepository,
    articles: SeaOrmArticleRepository,
    engagement: SeaOrmEngagementRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            categories: SeaOrmCategoryRepository::new(db.clone()),
            articles: SeaOrmArticleRepository::new(db.clone()),
            engagement: SeaOrmEngagementRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn categories(&self) -> &dyn CategoryRepository {
        &self.categories
    }

    fn articles(&self) -> &dyn ArticleRepository {
        &self.articles
    }

    fn engagement(&self) -> &dyn EngagementRepository {
        &self.engagement
    }
}
