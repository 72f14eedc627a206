//! Verification of mobile number changes on user claim update.
//!
//! Components:
//! - `handler`: the two-phase event handler
//! - `policy`: pure decisions over tenant flags and claims
//! - `accessor`: reads of persisted claims
//! - `coordinator`: per-operation state carried from pre- to post-phase
//! - `cleanup`: reclaims coordinator state whose post-phase never arrived
//! - `invalidator`: removal of stale pending verifications

pub mod accessor;
pub mod cleanup;
pub mod config;
pub mod coordinator;
pub mod handler;
pub mod invalidator;
pub mod policy;
pub mod traits;

#[cfg(test)]
mod tests;

pub use accessor::ClaimAccessor;
pub use cleanup::{CoordinatorCleanupConfig, CoordinatorCleanupService};
pub use config::{connector_keys, StaticConnectorConfigProvider, VerificationPolicyConfig};
pub use coordinator::CrossPhaseCoordinator;
pub use handler::{MobileNumberVerificationHandler, HANDLER_FRIENDLY_NAME, HANDLER_NAME};
pub use invalidator::RecoveryDataInvalidator;
pub use traits::{ClaimEventHandler, ConnectorConfigProvider, NotificationDispatcher};
