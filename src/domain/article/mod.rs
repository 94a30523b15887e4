//! Article aggregate

pub mod dto;
pub mod model;
pub mod repository;

pub use dto::{ArticleChanges, ArticleFilter, NewArticle};
pub use model::{parse_tags, sort_newest_first, Article};
pub use repository::ArticleRepository;
