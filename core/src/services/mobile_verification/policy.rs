//! Pure verification policy decisions

use crate::domain::entities::claims::{
    ClaimSet, MOBILE_NUMBERS_CLAIM, MOBILE_NUMBER_CLAIM, VERIFIED_MOBILE_NUMBERS_CLAIM,
    VERIFY_MOBILE_CLAIM,
};

use super::config::{parse_flag, VerificationPolicyConfig};

/// Verification pipeline is active for the tenant
pub fn should_verify_on_update(config: &VerificationPolicyConfig) -> bool {
    config.verification_on_update_enabled
}

pub fn is_multi_number_mode(config: &VerificationPolicyConfig) -> bool {
    config.multi_attribute_enabled
}

/// Verification only runs when `verifyMobile` is present and true
pub fn requires_explicit_verify_flag(config: &VerificationPolicyConfig) -> bool {
    config.use_explicit_verify_claim
}

pub fn is_already_verified<S: AsRef<str>>(number: &str, verified: &[S]) -> bool {
    verified.iter().any(|v| v.as_ref() == number)
}

/// Whether this operation asks for its number to be verified.
///
/// In explicit mode `verifyMobile` must be present and true. Otherwise
/// verification runs unless `verifyMobile` is present and false.
pub fn verification_requested(config: &VerificationPolicyConfig, claims: &ClaimSet) -> bool {
    let flag = claims.get(VERIFY_MOBILE_CLAIM).map(parse_flag);
    if requires_explicit_verify_flag(config) {
        flag.unwrap_or(false)
    } else {
        flag.unwrap_or(true)
    }
}

/// Whether the write touches any mobile number claim
pub fn has_mobile_claims(claims: &ClaimSet) -> bool {
    [MOBILE_NUMBER_CLAIM, VERIFIED_MOBILE_NUMBERS_CLAIM, MOBILE_NUMBERS_CLAIM]
        .iter()
        .any(|claim| claims.contains(claim))
}
