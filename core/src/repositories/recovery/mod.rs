//! Recovery data store module.

mod r#trait;
pub use r#trait::RecoveryDataStore;

mod mock;
pub use mock::MockRecoveryDataStore;
