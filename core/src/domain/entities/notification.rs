//! Notification requests handed to the external dispatcher.

use serde::{Deserialize, Serialize};

use super::event::UserIdentity;

/// Event name understood by the notification dispatcher
pub const TRIGGER_SMS_NOTIFICATION_EVENT: &str = "TRIGGER_SMS_NOTIFICATION";

/// Template used for mobile verification on claim update
pub const VERIFY_MOBILE_ON_UPDATE_TEMPLATE: &str = "verifyMobileOnUpdate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationChannel {
    Sms,
}

/// Request to deliver a verification code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub event_name: String,
    pub template_type: String,
    pub channel: NotificationChannel,
    pub user: UserIdentity,
    /// Number the message goes to
    pub send_to: String,
    pub confirmation_code: String,
}

impl NotificationRequest {
    /// SMS carrying the code that confirms `pending_number`
    pub fn verify_mobile_on_update(
        user: UserIdentity,
        pending_number: impl Into<String>,
        confirmation_code: impl Into<String>,
    ) -> Self {
        Self {
            event_name: TRIGGER_SMS_NOTIFICATION_EVENT.to_string(),
            template_type: VERIFY_MOBILE_ON_UPDATE_TEMPLATE.to_string(),
            channel: NotificationChannel::Sms,
            user,
            send_to: pending_number.into(),
            confirmation_code: confirmation_code.into(),
        }
    }
}
