//! Article endpoints: create, edit, delete and the read projections

pub mod dto;
pub mod form;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
