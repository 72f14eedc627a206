//! User claim store module.

mod r#trait;
pub use r#trait::UserClaimStore;

mod mock;
pub use mock::MockUserClaimStore;
