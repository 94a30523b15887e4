//! Local filesystem storage for article images.

pub mod local;

pub use local::{LocalImageStore, UploadConfig};
