//! Error types for the mobile verification handler.

mod types;

pub use types::{ClientError, ServerError, StoreError};

use mv_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Error raised by `handle_event`
#[derive(Error, Debug)]
pub enum EventHandlerError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

pub type HandlerResult<T> = Result<T, EventHandlerError>;

impl EventHandlerError {
    /// Whether the caller can correct the request
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Client(_))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Client(ClientError::InvalidVerifiedNumber { .. }) => {
                error_codes::INVALID_VERIFIED_NUMBER
            }
            Self::Server(ServerError::StoreUnavailable { .. }) => error_codes::USER_STORE_UNAVAILABLE,
            Self::Server(ServerError::RecoveryData { .. }) => error_codes::RECOVERY_DATA_ERROR,
            Self::Server(ServerError::ConfigUnavailable { .. }) => error_codes::CONFIG_UNAVAILABLE,
            Self::Server(ServerError::NotificationDispatch { .. }) => error_codes::NOTIFICATION_FAILED,
        }
    }
}

impl IntoErrorResponse for EventHandlerError {
    fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.to_string(), self.is_client_error())
    }
}

impl From<EventHandlerError> for ErrorResponse {
    fn from(err: EventHandlerError) -> Self {
        err.to_error_response()
    }
}
