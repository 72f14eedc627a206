//! Outcome of the pre-persistence evaluation of a mobile number update.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the post-persistence phase must not notify.
///
/// `None` means a genuine pending verification was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    #[default]
    None,
    /// The write did not touch mobile number claims
    InapplicableClaims,
    /// The write is the OTP confirmation of the pending number
    ConfirmedByOtpFlow,
    /// The write happens while an SMS OTP flow is in progress
    AlreadyInOtpFlow,
    /// The affected numbers are already verified
    AlreadyVerifiedNumbers,
    /// The primary number did not change
    NumberUnchanged,
}

impl SkipReason {
    pub fn is_skip(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::InapplicableClaims => "inapplicableClaims",
            Self::ConfirmedByOtpFlow => "confirmedByOtpFlow",
            Self::AlreadyInOtpFlow => "alreadyInOtpFlow",
            Self::AlreadyVerifiedNumbers => "alreadyVerifiedNumbers",
            Self::NumberUnchanged => "numberUnchanged",
        }
    }

    /// Reasons that only an external OTP component may set
    pub fn is_otp_flow(&self) -> bool {
        matches!(self, Self::ConfirmedByOtpFlow | Self::AlreadyInOtpFlow)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signal raised by an OTP component that is itself writing the mobile claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OtpFlowSignal {
    /// The pending number was confirmed and is being promoted to primary
    ConfirmingPendingNumber,
    /// An SMS OTP authentication flow is updating the number
    SmsOtpAuthentication,
}

impl From<OtpFlowSignal> for SkipReason {
    fn from(signal: OtpFlowSignal) -> Self {
        match signal {
            OtpFlowSignal::ConfirmingPendingNumber => SkipReason::ConfirmedByOtpFlow,
            OtpFlowSignal::SmsOtpAuthentication => SkipReason::AlreadyInOtpFlow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_none_proceeds() {
        assert!(!SkipReason::None.is_skip());
        assert!(SkipReason::NumberUnchanged.is_skip());
        assert!(SkipReason::InapplicableClaims.is_skip());
        assert_eq!(SkipReason::default(), SkipReason::None);
    }

    #[test]
    fn test_otp_signals_map_to_reasons() {
        assert_eq!(
            SkipReason::from(OtpFlowSignal::ConfirmingPendingNumber),
            SkipReason::ConfirmedByOtpFlow
        );
        assert_eq!(
            SkipReason::from(OtpFlowSignal::SmsOtpAuthentication),
            SkipReason::AlreadyInOtpFlow
        );
        assert!(SkipReason::AlreadyInOtpFlow.is_otp_flow());
        assert!(!SkipReason::AlreadyVerifiedNumbers.is_otp_flow());
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_string(&SkipReason::AlreadyVerifiedNumbers).unwrap();
        assert_eq!(json, "\"alreadyVerifiedNumbers\"");
    }
}
