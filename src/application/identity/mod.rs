//! Identity module: registration, authentication and profiles
//!
//! Contains the `UserService` which orchestrates all user-related
//! use-cases: registration, login, profile reads and updates, password changes.

pub mod service;

pub use service::{AuthResult, RegisterUser, UserProfile, UserService};
