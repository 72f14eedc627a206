//! Claim set carried by user claim update events.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The single primary mobile number
pub const MOBILE_NUMBER_CLAIM: &str = "mobileNumber";

/// Number awaiting OTP confirmation; empty string means none
pub const MOBILE_NUMBER_PENDING_VALUE_CLAIM: &str = "mobileNumberPendingValue";

/// All mobile numbers associated with the user (multi-attribute mode)
pub const MOBILE_NUMBERS_CLAIM: &str = "mobileNumbers";

/// Subset of `mobileNumbers` that completed OTP verification
pub const VERIFIED_MOBILE_NUMBERS_CLAIM: &str = "verifiedMobileNumbers";

/// Per-operation flag requesting or suppressing verification
pub const VERIFY_MOBILE_CLAIM: &str = "verifyMobile";

/// Separator used for multi-valued claims when none is configured
pub const DEFAULT_MULTI_ATTRIBUTE_SEPARATOR: &str = ",";

/// Claims an operation intends to write (pre-phase) or has written (post-phase).
///
/// Multi-valued claims are stored as a single string joined with the
/// configured separator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(HashMap<String, String>);

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, claim: &str) -> Option<&str> {
        self.0.get(claim).map(String::as_str)
    }

    /// Claim value with surrounding whitespace removed, `None` when blank
    pub fn non_blank(&self, claim: &str) -> Option<&str> {
        self.get(claim).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, claim: &str) -> bool {
        self.0.contains_key(claim)
    }

    pub fn set(&mut self, claim: impl Into<String>, value: impl Into<String>) {
        self.0.insert(claim.into(), value.into());
    }

    pub fn remove(&mut self, claim: &str) -> Option<String> {
        self.0.remove(claim)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Split a multi-valued claim. Blank entries are dropped and duplicates
    /// collapsed, keeping first-seen order.
    pub fn multi_values(&self, claim: &str, separator: &str) -> Vec<String> {
        self.get(claim)
            .map(|raw| split_multi_value(raw, separator))
            .unwrap_or_default()
    }

    /// Write a multi-valued claim
    pub fn set_multi_values<S: AsRef<str>>(&mut self, claim: &str, values: &[S], separator: &str) {
        let joined = values
            .iter()
            .map(|v| v.as_ref())
            .collect::<Vec<_>>()
            .join(separator);
        self.set(claim, joined);
    }
}

impl From<HashMap<String, String>> for ClaimSet {
    fn from(claims: HashMap<String, String>) -> Self {
        Self(claims)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Split a raw multi-valued claim string
pub fn split_multi_value(raw: &str, separator: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for value in raw.split(separator).map(str::trim).filter(|v| !v.is_empty()) {
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}
