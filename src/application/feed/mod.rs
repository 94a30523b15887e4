//! Feed composition.

pub mod composer;

pub use composer::FeedComposer;
