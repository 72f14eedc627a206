//! Business services containing domain logic and use cases.

pub mod mobile_verification;

// Re-export commonly used types
pub use mobile_verification::{
    ClaimEventHandler, ConnectorConfigProvider, CoordinatorCleanupService, CrossPhaseCoordinator,
    MobileNumberVerificationHandler, NotificationDispatcher, StaticConnectorConfigProvider,
    VerificationPolicyConfig,
};
