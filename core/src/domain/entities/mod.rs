//! Domain entities for mobile number claim updates.

pub mod claims;
pub mod event;
pub mod notification;
pub mod recovery;
pub mod skip_reason;

// Re-export commonly used types
pub use claims::{
    split_multi_value, ClaimSet, DEFAULT_MULTI_ATTRIBUTE_SEPARATOR, MOBILE_NUMBERS_CLAIM,
    MOBILE_NUMBER_CLAIM, MOBILE_NUMBER_PENDING_VALUE_CLAIM, VERIFIED_MOBILE_NUMBERS_CLAIM,
    VERIFY_MOBILE_CLAIM,
};
pub use event::{ClaimEvent, EventKind, OperationId, UserIdentity};
pub use notification::{NotificationChannel, NotificationRequest};
pub use recovery::{
    generate_secure_code, RecoveryRecord, RecoveryScenario, RecoveryStep, CODE_LENGTH,
    DEFAULT_CODE_EXPIRY_MINUTES,
};
pub use skip_reason::{OtpFlowSignal, SkipReason};
