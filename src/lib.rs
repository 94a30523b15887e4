//! # ReadRealm
//!
//! Article publishing platform: readers register with category
//! preferences, authors publish articles with an optional image, and every
//! user can like, dislike or block articles. Signed-in readers get a feed
//! built from their preferred categories.
//!
//! ## Architecture
//!
//! - **domain**: entities, engagement rules and repository traits
//! - **application**: use cases (identity, publishing, engagement, feed)
//! - **infrastructure**: SeaORM persistence, JWT/bcrypt, local image storage
//! - **interfaces**: axum REST API with Swagger documentation
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig};

pub use interfaces::http::create_api_router;
