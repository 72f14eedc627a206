//! Carries the pre-phase decision to the post-phase of the same operation
//!
//! Entries are keyed by `OperationId`, so concurrent operations (even for
//! the same user) never observe each other's decision. An operation whose
//! post-phase never arrives leaves an entry behind that no other operation
//! can read; `purge_stale` reclaims it.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entities::event::OperationId;
use crate::domain::entities::skip_reason::{OtpFlowSignal, SkipReason};

#[derive(Debug, Clone, Copy)]
struct Slot {
    reason: SkipReason,
    recorded_at: DateTime<Utc>,
}

/// Per-operation skip reasons shared between handler invocations
#[derive(Debug, Default)]
pub struct CrossPhaseCoordinator {
    slots: Mutex<HashMap<OperationId, Slot>>,
}

impl CrossPhaseCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the decision for an operation. `SkipReason::None` clears it.
    pub fn set_skip_reason(&self, operation: OperationId, reason: SkipReason) {
        let mut slots = self.slots();
        if reason.is_skip() {
            slots.insert(
                operation,
                Slot {
                    reason,
                    recorded_at: Utc::now(),
                },
            );
        } else {
            slots.remove(&operation);
        }
    }

    /// Recorded decision, `SkipReason::None` if unset
    pub fn get_skip_reason(&self, operation: OperationId) -> SkipReason {
        self.slots()
            .get(&operation)
            .map(|slot| slot.reason)
            .unwrap_or_default()
    }

    pub fn clear_skip_reason(&self, operation: OperationId) {
        self.slots().remove(&operation);
    }

    /// Read and clear in one step
    pub fn take_skip_reason(&self, operation: OperationId) -> SkipReason {
        self.slots()
            .remove(&operation)
            .map(|slot| slot.reason)
            .unwrap_or_default()
    }

    /// Called by an OTP component before it dispatches its own claim update
    pub fn mark_otp_flow(&self, operation: OperationId, signal: OtpFlowSignal) {
        self.set_skip_reason(operation, signal.into());
    }

    /// Drop entries older than `max_age`, returning how many were removed
    pub fn purge_stale(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut slots = self.slots();
        let before = slots.len();
        slots.retain(|_, slot| slot.recorded_at > cutoff);
        let purged = before - slots.len();
        if purged > 0 {
            tracing::warn!(
                purged = purged,
                event = "stale_skip_reasons_purged",
                "Purged skip reasons whose post-phase never arrived"
            );
        }
        purged
    }

    /// Operations with a recorded decision awaiting their post-phase
    pub fn pending_operations(&self) -> usize {
        self.slots().len()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<OperationId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let coordinator = CrossPhaseCoordinator::new();
        let op = OperationId::new();

        assert_eq!(coordinator.get_skip_reason(op), SkipReason::None);
        coordinator.set_skip_reason(op, SkipReason::NumberUnchanged);
        assert_eq!(coordinator.get_skip_reason(op), SkipReason::NumberUnchanged);
        // reading does not consume
        assert_eq!(coordinator.get_skip_reason(op), SkipReason::NumberUnchanged);

        coordinator.clear_skip_reason(op);
        assert_eq!(coordinator.get_skip_reason(op), SkipReason::None);
        assert_eq!(coordinator.pending_operations(), 0);
    }

    #[test]
    fn test_take_consumes() {
        let coordinator = CrossPhaseCoordinator::new();
        let op = OperationId::new();

        coordinator.set_skip_reason(op, SkipReason::InapplicableClaims);
        assert_eq!(coordinator.take_skip_reason(op), SkipReason::InapplicableClaims);
        assert_eq!(coordinator.take_skip_reason(op), SkipReason::None);
    }

    #[test]
    fn test_operations_are_isolated() {
        let coordinator = CrossPhaseCoordinator::new();
        let first = OperationId::new();
        let second = OperationId::new();

        coordinator.set_skip_reason(first, SkipReason::AlreadyVerifiedNumbers);
        assert_eq!(coordinator.get_skip_reason(second), SkipReason::None);
        assert_eq!(coordinator.take_skip_reason(first), SkipReason::AlreadyVerifiedNumbers);
    }

    #[test]
    fn test_setting_none_clears() {
        let coordinator = CrossPhaseCoordinator::new();
        let op = OperationId::new();

        coordinator.set_skip_reason(op, SkipReason::NumberUnchanged);
        coordinator.set_skip_reason(op, SkipReason::None);
        assert_eq!(coordinator.pending_operations(), 0);
    }

    #[test]
    fn test_mark_otp_flow() {
        let coordinator = CrossPhaseCoordinator::new();
        let op = OperationId::new();

        coordinator.mark_otp_flow(op, OtpFlowSignal::SmsOtpAuthentication);
        assert_eq!(coordinator.get_skip_reason(op), SkipReason::AlreadyInOtpFlow);
    }

    #[test]
    fn test_purge_stale() {
        let coordinator = CrossPhaseCoordinator::new();
        coordinator.set_skip_reason(OperationId::new(), SkipReason::NumberUnchanged);
        coordinator.set_skip_reason(OperationId::new(), SkipReason::InapplicableClaims);

        assert_eq!(coordinator.purge_stale(Duration::minutes(5)), 0);
        assert_eq!(coordinator.purge_stale(Duration::seconds(-1)), 2);
        assert_eq!(coordinator.pending_operations(), 0);
    }
}
