//! Shared utilities and common types for the mobile verification service
//!
//! This crate provides functionality used across the workspace:
//! - Configuration types and loading (environment, logging, connectors)
//! - Logging initialisation
//! - Error response structures
//! - Phone number utilities for log-safe output

pub mod config;
pub mod errors;
pub mod logging;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, ConnectorSettings, Environment, LogFormat, LoggingConfig};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use logging::init_tracing;
pub use utils::phone;
