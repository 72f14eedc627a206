//! Recovery data store trait for pending verification records.

use async_trait::async_trait;

use crate::domain::entities::event::UserIdentity;
use crate::domain::entities::recovery::{RecoveryRecord, RecoveryScenario, RecoveryStep};
use crate::errors::StoreError;

/// Persistence for in-progress verification and recovery flows
#[async_trait]
pub trait RecoveryDataStore: Send + Sync {
    /// Void every record of `user` for the scenario and step.
    /// Succeeds when there is nothing to invalidate.
    async fn invalidate(
        &self,
        user: &UserIdentity,
        scenario: RecoveryScenario,
        step: RecoveryStep,
    ) -> Result<(), StoreError>;

    /// Store a newly issued record
    async fn store(&self, record: &RecoveryRecord) -> Result<(), StoreError>;
}
