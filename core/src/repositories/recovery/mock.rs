//! Mock implementation of RecoveryDataStore for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::entities::event::UserIdentity;
use crate::domain::entities::recovery::{RecoveryRecord, RecoveryScenario, RecoveryStep};
use crate::errors::StoreError;

use super::RecoveryDataStore;

/// Mock recovery data store recording every call
pub struct MockRecoveryDataStore {
    records: Arc<Mutex<Vec<RecoveryRecord>>>,
    invalidations: Arc<Mutex<Vec<(UserIdentity, RecoveryScenario, RecoveryStep)>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockRecoveryDataStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            invalidations: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    /// Records still valid
    pub fn records(&self) -> Vec<RecoveryRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn invalidations(&self) -> Vec<(UserIdentity, RecoveryScenario, RecoveryStep)> {
        self.invalidations.lock().unwrap().clone()
    }

    pub fn invalidation_count(&self) -> usize {
        self.invalidations.lock().unwrap().len()
    }
}

impl Default for MockRecoveryDataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecoveryDataStore for MockRecoveryDataStore {
    async fn invalidate(
        &self,
        user: &UserIdentity,
        scenario: RecoveryScenario,
        step: RecoveryStep,
    ) -> Result<(), StoreError> {
        if *self.should_fail.lock().unwrap() {
            return Err(StoreError::Unavailable {
                message: "Mock recovery store error".to_string(),
            });
        }

        self.invalidations
            .lock()
            .unwrap()
            .push((user.clone(), scenario, step));
        self.records
            .lock()
            .unwrap()
            .retain(|r| !(r.user == *user && r.scenario == scenario && r.step == step));
        Ok(())
    }

    async fn store(&self, record: &RecoveryRecord) -> Result<(), StoreError> {
        if *self.should_fail.lock().unwrap() {
            return Err(StoreError::Unavailable {
                message: "Mock recovery store error".to_string(),
            });
        }

        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
