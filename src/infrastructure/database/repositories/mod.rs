//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod article_repository;
pub mod category_repository;
pub mod engagement_repository;
pub mod repository_provider;
pub mod user_repository;

pub use article_repository::SeaOrmArticleRepository;
pub use category_repository::SeaOrmCategoryRepository;
pub use engagement_repository::SeaOrmEngagementRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::SeaOrmUserRepository;
