//! Domain layer containing claim update entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
