//! Error types for mobile number claim update handling
//!
//! Collaborator failures are reported as `StoreError`. The handler wraps
//! them into `ServerError`; caller-correctable problems are `ClientError`.

use thiserror::Error;

/// Failure reported by a storage-backed collaborator
/// (user store, recovery data store, connector configuration)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Store rejected the request: {message}")]
    Rejected { message: String },
}

/// Errors the caller can correct
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Mobile number {number} is not associated with the user and cannot be marked as verified")]
    InvalidVerifiedNumber { number: String },
}

/// Infrastructure failures surfaced to the event source
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Error retrieving claim {claim} for user {username}")]
    StoreUnavailable {
        claim: String,
        username: String,
        #[source]
        source: StoreError,
    },

    #[error("Error updating recovery data for user {username}")]
    RecoveryData {
        username: String,
        #[source]
        source: StoreError,
    },

    #[error("Error reading connector config {key} for tenant {tenant_domain}")]
    ConfigUnavailable {
        key: String,
        tenant_domain: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to dispatch verification notification: {message}")]
    NotificationDispatch { message: String },
}
