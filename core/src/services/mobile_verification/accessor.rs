//! Read access to the user's persisted mobile number claims

use std::sync::Arc;

use crate::domain::entities::claims::{
    split_multi_value, MOBILE_NUMBER_CLAIM, MOBILE_NUMBER_PENDING_VALUE_CLAIM,
};
use crate::domain::entities::event::UserIdentity;
use crate::errors::{ServerError, StoreError};
use crate::repositories::UserClaimStore;

/// Reads claim values straight from the user store. Nothing is cached.
pub struct ClaimAccessor<S: UserClaimStore> {
    store: Arc<S>,
}

impl<S: UserClaimStore> ClaimAccessor<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Current primary mobile number, `None` when unset or blank
    pub async fn get_existing_primary(&self, user: &UserIdentity) -> Result<Option<String>, ServerError> {
        let value = self.read(user, MOBILE_NUMBER_CLAIM).await?;
        Ok(value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    /// Values of a multi-valued claim, empty when unset
    pub async fn get_multi_valued_claim(
        &self,
        user: &UserIdentity,
        claim: &str,
        separator: &str,
    ) -> Result<Vec<String>, ServerError> {
        let value = self.read(user, claim).await?;
        Ok(value
            .map(|raw| split_multi_value(&raw, separator))
            .unwrap_or_default())
    }

    /// Number awaiting verification, empty string when none
    pub async fn get_pending_value(&self, user: &UserIdentity) -> Result<String, ServerError> {
        let mut values = self
            .store
            .get_claim_values(user, &[MOBILE_NUMBER_PENDING_VALUE_CLAIM])
            .await
            .map_err(|source| store_unavailable(user, MOBILE_NUMBER_PENDING_VALUE_CLAIM, source))?;

        Ok(values
            .remove(MOBILE_NUMBER_PENDING_VALUE_CLAIM)
            .map(|v| v.trim().to_string())
            .unwrap_or_default())
    }

    async fn read(&self, user: &UserIdentity, claim: &str) -> Result<Option<String>, ServerError> {
        self.store
            .get_claim_value(user, claim)
            .await
            .map_err(|source| store_unavailable(user, claim, source))
    }
}

fn store_unavailable(
    user: &UserIdentity,
    claim: &str,
    source: StoreError,
) -> ServerError {
    tracing::error!(
        username = %user.username,
        tenant_domain = %user.tenant_domain,
        claim = claim,
        error = %source,
        event = "claim_read_failed",
        "Failed to read user claim"
    );
    ServerError::StoreUnavailable {
        claim: claim.to_string(),
        username: user.username.clone(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::claims::MOBILE_NUMBERS_CLAIM;
    use crate::repositories::MockUserClaimStore;

    fn user() -> UserIdentity {
        UserIdentity::new("testuser", "test.com", "TESTING")
    }

    #[tokio::test]
    async fn test_reads_reflect_store() {
        let store = Arc::new(MockUserClaimStore::new());
        let accessor = ClaimAccessor::new(store.clone());

        assert_eq!(accessor.get_existing_primary(&user()).await.unwrap(), None);
        assert_eq!(accessor.get_pending_value(&user()).await.unwrap(), "");
        assert!(accessor
            .get_multi_valued_claim(&user(), MOBILE_NUMBERS_CLAIM, ",")
            .await
            .unwrap()
            .is_empty());

        store.set_claim("testuser", MOBILE_NUMBER_CLAIM, "0711111111");
        store.set_claim("testuser", MOBILE_NUMBERS_CLAIM, "0777777777,0711111111");
        store.set_claim("testuser", MOBILE_NUMBER_PENDING_VALUE_CLAIM, "0722222222");

        assert_eq!(
            accessor.get_existing_primary(&user()).await.unwrap().as_deref(),
            Some("0711111111")
        );
        assert_eq!(accessor.get_pending_value(&user()).await.unwrap(), "0722222222");
        assert_eq!(
            accessor
                .get_multi_valued_claim(&user(), MOBILE_NUMBERS_CLAIM, ",")
                .await
                .unwrap(),
            vec!["0777777777", "0711111111"]
        );
    }

    #[tokio::test]
    async fn test_store_fault_is_surfaced() {
        let store = Arc::new(MockUserClaimStore::new());
        store.set_should_fail(true);
        let accessor = ClaimAccessor::new(store);

        let err = accessor.get_existing_primary(&user()).await.unwrap_err();
        match err {
            ServerError::StoreUnavailable { claim, username, .. } => {
                assert_eq!(claim, MOBILE_NUMBER_CLAIM);
                assert_eq!(username, "testuser");
            }
            other => panic!("Expected StoreUnavailable, got {:?}", other),
        }
        assert!(accessor.get_pending_value(&user()).await.is_err());
    }
}
