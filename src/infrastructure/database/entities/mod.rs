//! Database entities module

pub mod article;
pub mod article_block;
pub mod article_reaction;
pub mod category;
pub mod user;

pub use article::Entity as Article;
pub use article_block::Entity as ArticleBlock;
pub use article_reaction::Entity as ArticleReaction;
pub use category::Entity as Category;
pub use user::Entity as User;
