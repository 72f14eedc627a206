//! Shared error response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error response handed back to the event source or an API layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Whether the caller can correct the request and retry
    pub client_error: bool,

    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>, client_error: bool) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            client_error,
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Error codes reported by claim update handlers
pub mod error_codes {
    pub const INVALID_VERIFIED_NUMBER: &str = "INVALID_VERIFIED_NUMBER";
    pub const USER_STORE_UNAVAILABLE: &str = "USER_STORE_UNAVAILABLE";
    pub const RECOVERY_DATA_ERROR: &str = "RECOVERY_DATA_ERROR";
    pub const CONFIG_UNAVAILABLE: &str = "CONFIG_UNAVAILABLE";
    pub const NOTIFICATION_FAILED: &str = "NOTIFICATION_FAILED";
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}
