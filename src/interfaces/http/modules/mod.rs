pub mod articles;
pub mod auth;
pub mod categories;
pub mod engagement;
pub mod feed;
pub mod health;
pub mod metrics;
pub mod request_id;
