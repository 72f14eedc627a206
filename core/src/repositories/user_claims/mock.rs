//! In-memory implementation of UserClaimStore for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::domain::entities::claims::ClaimSet;
use crate::domain::entities::event::UserIdentity;
use crate::errors::StoreError;

use super::UserClaimStore;

/// Mock user store keyed by username
pub struct MockUserClaimStore {
    claims: Arc<Mutex<HashMap<String, HashMap<String, String>>>>,
    failing_claims: Arc<Mutex<HashSet<String>>>,
    should_fail: Arc<Mutex<bool>>,
    reads: Arc<Mutex<Vec<String>>>,
}

impl MockUserClaimStore {
    pub fn new() -> Self {
        Self {
            claims: Arc::new(Mutex::new(HashMap::new())),
            failing_claims: Arc::new(Mutex::new(HashSet::new())),
            should_fail: Arc::new(Mutex::new(false)),
            reads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a persisted claim value
    pub fn set_claim(&self, username: &str, claim: &str, value: &str) {
        self.claims
            .lock()
            .unwrap()
            .entry(username.to_string())
            .or_default()
            .insert(claim.to_string(), value.to_string());
    }

    /// Persist a claim set the way the event source would after the pre-phase
    pub fn persist(&self, username: &str, claims: &ClaimSet) {
        for (claim, value) in claims.iter() {
            self.set_claim(username, claim, value);
        }
    }

    pub fn claim(&self, username: &str, claim: &str) -> Option<String> {
        self.claims
            .lock()
            .unwrap()
            .get(username)
            .and_then(|c| c.get(claim))
            .cloned()
    }

    /// Make every read fail
    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    /// Make reads of a single claim fail
    pub fn fail_on_claim(&self, claim: &str) {
        self.failing_claims.lock().unwrap().insert(claim.to_string());
    }

    /// Claims read so far, in order
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }

    fn check(&self, claim: &str) -> Result<(), StoreError> {
        self.reads.lock().unwrap().push(claim.to_string());
        if *self.should_fail.lock().unwrap() || self.failing_claims.lock().unwrap().contains(claim) {
            return Err(StoreError::Unavailable {
                message: "Mock user store error".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockUserClaimStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserClaimStore for MockUserClaimStore {
    async fn get_claim_value(
        &self,
        user: &UserIdentity,
        claim: &str,
    ) -> Result<Option<String>, StoreError> {
        self.check(claim)?;
        Ok(self.claim(&user.username, claim))
    }

    async fn get_claim_values(
        &self,
        user: &UserIdentity,
        claims: &[&str],
    ) -> Result<HashMap<String, String>, StoreError> {
        let mut values = HashMap::new();
        for claim in claims {
            self.check(claim)?;
            if let Some(value) = self.claim(&user.username, claim) {
                values.insert(claim.to_string(), value);
            }
        }
        Ok(values)
    }
}
