//! Recovery data records tracking in-progress verification flows.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use super::event::UserIdentity;

/// Length of the SMS verification code
pub const CODE_LENGTH: usize = 6;

/// Default lifetime of an SMS verification code
pub const DEFAULT_CODE_EXPIRY_MINUTES: i64 = 5;

/// Recovery scenario a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecoveryScenario {
    MobileVerificationOnUpdate,
}

impl RecoveryScenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MobileVerificationOnUpdate => "MOBILE_VERIFICATION_ON_UPDATE",
        }
    }
}

/// Step within a recovery scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecoveryStep {
    VerifyMobileNumber,
}

impl RecoveryStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VerifyMobileNumber => "VERIFY_MOBILE_NUMBER",
        }
    }
}

/// A pending verification issued for a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryRecord {
    pub user: UserIdentity,
    /// Code the user must echo back
    pub code: String,
    pub scenario: RecoveryScenario,
    pub step: RecoveryStep,
    /// Number being verified
    pub data: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl RecoveryRecord {
    /// Issue a new mobile-verification-on-update record with a fresh code
    pub fn mobile_verification(user: UserIdentity, mobile_number: impl Into<String>, expiry_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            user,
            code: generate_secure_code(),
            scenario: RecoveryScenario::MobileVerificationOnUpdate,
            step: RecoveryStep::VerifyMobileNumber,
            data: mobile_number.into(),
            created_at: now,
            expires_at: now + Duration::minutes(expiry_minutes),
        }
    }
}

/// Generate a six digit code from the OS CSPRNG
pub fn generate_secure_code() -> String {
    let mut bytes = [0u8; 4];
    OsRng.fill_bytes(&mut bytes);
    // Modulo bias is negligible for six digits
    let code = u32::from_le_bytes(bytes) % 1_000_000;
    format!("{:06}", code)
}
