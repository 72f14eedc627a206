//! # Mobile Verification Core
//!
//! Domain layer for verifying mobile number changes made through user claim
//! updates. This crate contains the claim and event entities, the two-phase
//! verification handler, repository interfaces and error types.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod errors;

// Re-export commonly used types for convenience
pub use domain::*;
pub use services::*;
pub use repositories::*;
pub use errors::*;
