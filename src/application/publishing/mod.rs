//! Publishing: categories and articles.

pub mod articles;
pub mod categories;

pub use articles::{ArticleDraft, ArticleEdit, ArticleService};
pub use categories::CategoryService;
