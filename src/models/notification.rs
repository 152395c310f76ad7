use serde::Serialize;

use crate::config::Config;

/// Classification attributes attached to every outgoing SMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageAttributes {
    pub sender_id: String,
    /// "Promotional" or "Transactional" for SNS-compatible gateways.
    pub sms_type: String,
}

/// Where notifications go and how they are tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTarget {
    pub phone_number: String,
    pub attributes: MessageAttributes,
}

impl NotificationTarget {
    pub fn from_config(config: &Config) -> Self {
        Self {
            phone_number: config.notify_phone_number.clone(),
            attributes: MessageAttributes {
                sender_id: config.sender_id.clone(),
                sms_type: config.message_type.clone(),
            },
        }
    }
}
