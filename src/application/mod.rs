pub mod engagement;
pub mod feed;
pub mod identity;
pub mod ports;
pub mod publishing;

// Re-export key types for convenience
pub use engagement::{EngagementOutcome, EngagementService};
pub use feed::FeedComposer;
pub use identity::{AuthResult, RegisterUser, UserProfile, UserService};
pub use ports::{ImageStore, ImageUpload};
pub use publishing::{ArticleDraft, ArticleEdit, ArticleService, CategoryService};
