//! Domain layer: entities, value objects and repository interfaces.

pub mod article;
pub mod category;
pub mod engagement;
pub mod feed;
pub mod repositories;
pub mod user;

pub use article::{Article, ArticleChanges, ArticleFilter, ArticleRepository, NewArticle};
pub use category::{Category, CategoryRepository};
pub use engagement::{EngagementAction, EngagementRepository, Reaction};
pub use feed::Feed;
pub use repositories::{DomainResult, RepositoryProvider};
pub use user::{CreateUserDto, UpdateUserDto, User, UserRepository};

pub use crate::shared::DomainError;
