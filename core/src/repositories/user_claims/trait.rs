//! User claim store trait defining read access to persisted user claims.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::entities::event::UserIdentity;
use crate::errors::StoreError;

/// Read access to the claims persisted for a user.
///
/// Implementations must not cache: every call reflects the current
/// persisted state. Faults are reported, never defaulted to "no value".
#[async_trait]
pub trait UserClaimStore: Send + Sync {
    /// Get a single claim value
    ///
    /// # Returns
    /// * `Ok(Some(value))` - Claim is set
    /// * `Ok(None)` - Claim is not set for the user
    /// * `Err(StoreError)` - The backing store failed
    async fn get_claim_value(
        &self,
        user: &UserIdentity,
        claim: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Get several claim values at once. Unset claims are absent from the map.
    async fn get_claim_values(
        &self,
        user: &UserIdentity,
        claims: &[&str],
    ) -> Result<HashMap<String, String>, StoreError>;
}
