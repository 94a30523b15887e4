//! Article engagement (reactions and blocks)

pub mod model;
pub mod repository;

pub use model::{toggle_block, toggle_reaction, EngagementAction, Reaction, ReactionTransition};
pub use repository::EngagementRepository;
