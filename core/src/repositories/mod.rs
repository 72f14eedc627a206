pub mod recovery;
pub mod user_claims;

pub use recovery::{MockRecoveryDataStore, RecoveryDataStore};
pub use user_claims::{MockUserClaimStore, UserClaimStore};
