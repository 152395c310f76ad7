use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::{
    config::Config,
    models::notification::{MessageAttributes, NotificationTarget},
};

pub const TEST_MESSAGE: &str = "SNS topic message for testing purpose...";

const SENDER_ID_ATTRIBUTE: &str = "AWS.SNS.SMS.SenderID";
const SMS_TYPE_ATTRIBUTE: &str = "AWS.SNS.SMS.SMSType";

/// Best-effort delivery of a short text message to a phone number.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(
        &self,
        message: &str,
        phone_number: &str,
        attributes: &MessageAttributes,
    ) -> anyhow::Result<()>;
}

/// Publishes SNS-shaped SMS requests to an HTTP dispatch gateway.
pub struct SmsNotifier {
    client: Client,
    gateway_url: Option<String>,
    api_key: Option<String>,
}

impl SmsNotifier {
    pub fn new(
        gateway_url: Option<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            gateway_url,
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            config.sms_gateway_url.clone(),
            config.sms_gateway_api_key.clone(),
            config.http_timeout(),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.gateway_url.is_some()
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    async fn publish(
        &self,
        message: &str,
        phone_number: &str,
        attributes: &MessageAttributes,
    ) -> anyhow::Result<()> {
        let url = match &self.gateway_url {
            Some(u) => u,
            None => {
                tracing::debug!("SMS gateway not configured, skipping notification");
                return Ok(());
            }
        };

        let mut request = self
            .client
            .post(url)
            .json(&publish_payload(message, phone_number, attributes));

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("SMS gateway error {}: {}", status, text);
        }

        tracing::debug!("SMS published to {}", phone_number);
        Ok(())
    }
}

/// Body of an SNS `Publish` call targeting a single phone number.
pub fn publish_payload(message: &str, phone_number: &str, attributes: &MessageAttributes) -> Value {
    json!({
        "Message": message,
        "PhoneNumber": phone_number,
        "MessageAttributes": {
            SENDER_ID_ATTRIBUTE: {
                "DataType": "String",
                "StringValue": attributes.sender_id,
            },
            SMS_TYPE_ATTRIBUTE: {
                "DataType": "String",
                "StringValue": attributes.sms_type,
            },
        }
    })
}

/// Send the fixed connectivity-check message to the configured destination.
/// Unlike menu notifications, a delivery failure is returned to the caller.
pub async fn send_test_message(
    notifier: &dyn Notifier,
    target: &NotificationTarget,
) -> anyhow::Result<()> {
    notifier
        .publish(TEST_MESSAGE, &target.phone_number, &target.attributes)
        .await?;
    tracing::info!("Test message dispatched to {}", target.phone_number);
    Ok(())
}
