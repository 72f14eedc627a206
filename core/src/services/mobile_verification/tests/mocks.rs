//! Mock implementations for testing the mobile verification handler

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::entities::claims::ClaimSet;
use crate::domain::entities::event::{ClaimEvent, OperationId, UserIdentity};
use crate::domain::entities::notification::NotificationRequest;
use crate::errors::{HandlerResult, StoreError};
use crate::repositories::{MockRecoveryDataStore, MockUserClaimStore};
use crate::services::mobile_verification::config::connector_keys;
use crate::services::mobile_verification::{
    ClaimEventHandler, ConnectorConfigProvider, CrossPhaseCoordinator,
    MobileNumberVerificationHandler, NotificationDispatcher,
};

pub const TEST_USERNAME: &str = "testuser";
pub const TEST_TENANT_DOMAIN: &str = "test.com";
pub const TEST_USER_STORE_DOMAIN: &str = "TESTING";

pub const EXISTING_NUMBER_1: &str = "0777777777";
pub const EXISTING_NUMBER_2: &str = "0711111111";
pub const NEW_MOBILE_NUMBER: &str = "0722222222";

pub fn test_user() -> UserIdentity {
    UserIdentity::new(TEST_USERNAME, TEST_TENANT_DOMAIN, TEST_USER_STORE_DOMAIN)
}

pub fn claims(pairs: &[(&str, &str)]) -> ClaimSet {
    pairs.iter().copied().collect()
}

// Mock notification dispatcher for testing
pub struct MockNotificationDispatcher {
    pub sent: Arc<Mutex<Vec<NotificationRequest>>>,
    pub should_fail: bool,
}

impl MockNotificationDispatcher {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail,
        }
    }

    pub fn sent_requests(&self) -> Vec<NotificationRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for MockNotificationDispatcher {
    async fn dispatch(&self, request: NotificationRequest) -> Result<(), String> {
        if self.should_fail {
            return Err("Notification service error".to_string());
        }
        self.sent.lock().unwrap().push(request);
        Ok(())
    }
}

// Mock connector configuration for testing
pub struct MockConnectorConfigProvider {
    pub values: Arc<Mutex<HashMap<String, String>>>,
    pub should_fail: bool,
}

impl MockConnectorConfigProvider {
    pub fn new(should_fail: bool) -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
            should_fail,
        }
    }

    pub fn with_flags(enabled: bool, multi_attribute: bool, explicit_verify: bool) -> Self {
        let provider = Self::new(false);
        provider.set(
            connector_keys::ENABLE_MOBILE_VERIFICATION_ON_UPDATE,
            &enabled.to_string(),
        );
        provider.set(
            connector_keys::ENABLE_MULTIPLE_MOBILE_NUMBERS,
            &multi_attribute.to_string(),
        );
        provider.set(connector_keys::USE_VERIFY_CLAIM, &explicit_verify.to_string());
        provider
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl ConnectorConfigProvider for MockConnectorConfigProvider {
    async fn get_connector_config(
        &self,
        key: &str,
        _tenant_domain: &str,
    ) -> Result<Option<String>, StoreError> {
        if self.should_fail {
            return Err(StoreError::Unavailable {
                message: "Mock config store error".to_string(),
            });
        }
        Ok(self.values.lock().unwrap().get(key).cloned())
    }
}

pub type TestHandler = MobileNumberVerificationHandler<
    MockUserClaimStore,
    MockRecoveryDataStore,
    MockConnectorConfigProvider,
    MockNotificationDispatcher,
>;

/// Handler wired to mocks, with handles on every collaborator
pub struct TestContext {
    pub handler: TestHandler,
    pub user_store: Arc<MockUserClaimStore>,
    pub recovery_store: Arc<MockRecoveryDataStore>,
    pub config: Arc<MockConnectorConfigProvider>,
    pub dispatcher: Arc<MockNotificationDispatcher>,
    pub coordinator: Arc<CrossPhaseCoordinator>,
}

impl TestContext {
    pub fn new(enabled: bool, multi_attribute: bool, explicit_verify: bool) -> Self {
        Self::build(
            MockConnectorConfigProvider::with_flags(enabled, multi_attribute, explicit_verify),
            MockNotificationDispatcher::new(false),
        )
    }

    pub fn build(config: MockConnectorConfigProvider, dispatcher: MockNotificationDispatcher) -> Self {
        let user_store = Arc::new(MockUserClaimStore::new());
        let recovery_store = Arc::new(MockRecoveryDataStore::new());
        let config = Arc::new(config);
        let dispatcher = Arc::new(dispatcher);
        let coordinator = Arc::new(CrossPhaseCoordinator::new());

        let handler = MobileNumberVerificationHandler::new(
            user_store.clone(),
            recovery_store.clone(),
            config.clone(),
            dispatcher.clone(),
            coordinator.clone(),
        );

        Self {
            handler,
            user_store,
            recovery_store,
            config,
            dispatcher,
            coordinator,
        }
    }

    /// Persisted claim of the test user
    pub fn stored(&self, claim: &str) -> Option<String> {
        self.user_store.claim(TEST_USERNAME, claim)
    }

    pub fn store(&self, claim: &str, value: &str) {
        self.user_store.set_claim(TEST_USERNAME, claim, value);
    }

    /// Run the pre-phase for a fresh operation
    pub async fn pre(&self, pairs: &[(&str, &str)]) -> (OperationId, ClaimEvent, HandlerResult<()>) {
        let operation_id = OperationId::new();
        let (event, result) = self.pre_for(operation_id, pairs).await;
        (operation_id, event, result)
    }

    pub async fn pre_for(
        &self,
        operation_id: OperationId,
        pairs: &[(&str, &str)],
    ) -> (ClaimEvent, HandlerResult<()>) {
        let mut event = ClaimEvent::pre_set_user_claims(operation_id, test_user(), claims(pairs));
        let result = self.handler.handle_event(&mut event).await;
        (event, result)
    }

    /// Persist the pre-phase output, then run the post-phase
    pub async fn persist_and_post(&self, event: &ClaimEvent) -> HandlerResult<()> {
        self.user_store.persist(TEST_USERNAME, &event.claims);
        self.post(event.operation_id).await
    }

    pub async fn post(&self, operation_id: OperationId) -> HandlerResult<()> {
        let mut event = ClaimEvent::post_set_user_claims(operation_id, test_user());
        self.handler.handle_event(&mut event).await
    }
}
