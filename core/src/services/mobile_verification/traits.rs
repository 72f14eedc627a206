//! Collaborator traits for the mobile verification handler

use async_trait::async_trait;

use crate::domain::entities::event::ClaimEvent;
use crate::domain::entities::notification::NotificationRequest;
use crate::errors::{HandlerResult, StoreError};

/// Tenant-scoped connector configuration
#[async_trait]
pub trait ConnectorConfigProvider: Send + Sync {
    /// Raw property value for a tenant, `None` when not configured
    async fn get_connector_config(
        &self,
        key: &str,
        tenant_domain: &str,
    ) -> Result<Option<String>, StoreError>;
}

/// Outbound notification channel (SMS delivery lives behind it)
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Queue a notification for delivery
    async fn dispatch(&self, request: NotificationRequest) -> Result<(), String>;
}

/// Handler subscribed to user claim update events
#[async_trait]
pub trait ClaimEventHandler: Send + Sync {
    /// Stable handler name used for registration
    fn name(&self) -> &'static str;

    /// Human-readable handler name
    fn friendly_name(&self) -> &'static str;

    /// Handle one event. Pre-phase events may have their claims rewritten.
    async fn handle_event(&self, event: &mut ClaimEvent) -> HandlerResult<()>;
}
