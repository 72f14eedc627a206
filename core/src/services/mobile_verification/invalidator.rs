//! Voids pending mobile verification records

use std::sync::Arc;

use crate::domain::entities::event::UserIdentity;
use crate::domain::entities::recovery::{RecoveryScenario, RecoveryStep};
use crate::errors::ServerError;
use crate::repositories::RecoveryDataStore;

pub struct RecoveryDataInvalidator<R: RecoveryDataStore> {
    store: Arc<R>,
}

impl<R: RecoveryDataStore> RecoveryDataInvalidator<R> {
    pub fn new(store: Arc<R>) -> Self {
        Self { store }
    }

    /// Invalidate any mobile-verification-on-update record issued to `user`
    pub async fn invalidate_pending_verification(&self, user: &UserIdentity) -> Result<(), ServerError> {
        tracing::debug!(
            username = %user.username,
            tenant_domain = %user.tenant_domain,
            event = "invalidate_pending_mobile_verification",
            "Invalidating pending mobile verification"
        );

        self.store
            .invalidate(
                user,
                RecoveryScenario::MobileVerificationOnUpdate,
                RecoveryStep::VerifyMobileNumber,
            )
            .await
            .map_err(|source| {
                tracing::error!(
                    username = %user.username,
                    error = %source,
                    "Failed to invalidate pending mobile verification"
                );
                ServerError::RecoveryData {
                    username: user.username.clone(),
                    source,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::recovery::RecoveryRecord;
    use crate::repositories::MockRecoveryDataStore;

    #[tokio::test]
    async fn test_invalidates_only_mobile_scenario_for_user() {
        let store = Arc::new(MockRecoveryDataStore::new());
        let user = UserIdentity::new("testuser", "test.com", "TESTING");
        let other = UserIdentity::new("other", "test.com", "TESTING");
        store
            .store(&RecoveryRecord::mobile_verification(user.clone(), "0722222222", 5))
            .await
            .unwrap();
        store
            .store(&RecoveryRecord::mobile_verification(other.clone(), "0733333333", 5))
            .await
            .unwrap();

        let invalidator = RecoveryDataInvalidator::new(store.clone());
        invalidator.invalidate_pending_verification(&user).await.unwrap();

        let remaining = store.records();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user, other);
        assert_eq!(
            store.invalidations(),
            vec![(
                user,
                RecoveryScenario::MobileVerificationOnUpdate,
                RecoveryStep::VerifyMobileNumber
            )]
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_wrapped() {
        let store = Arc::new(MockRecoveryDataStore::new());
        store.set_should_fail(true);
        let invalidator = RecoveryDataInvalidator::new(store);

        let err = invalidator
            .invalidate_pending_verification(&UserIdentity::new("testuser", "test.com", "TESTING"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::RecoveryData { .. }));
    }
}
