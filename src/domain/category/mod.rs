//! Category aggregate

pub mod model;
pub mod repository;

pub use model::{normalize_name, Category};
pub use repository::CategoryRepository;
