//! Like / dislike / block use-cases.

pub mod service;

pub use service::{EngagementOutcome, EngagementService};
