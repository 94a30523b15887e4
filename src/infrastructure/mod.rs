//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod uploads;

pub use database::{init_and_migrate, init_database, DatabaseConfig};
pub use uploads::{LocalImageStore, UploadConfig};
