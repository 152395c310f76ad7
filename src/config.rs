use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub struct Config {
    pub nutrislice_base_url: String,
    pub sender_id: String,
    pub message_type: String,
    pub notify_phone_number: String,
    pub sms_gateway_url: Option<String>,
    pub sms_gateway_api_key: Option<String>,
    pub http_timeout_seconds: u64,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            nutrislice_base_url: env::var("NUTRISLICE_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "https://lindberghschools.api.nutrislice.com".into()),
            sender_id: required("SENDER_ID")?,
            message_type: required("MESSAGE_TYPE")?,
            notify_phone_number: required("NOTIFY_PHONE_NUMBER")?,
            sms_gateway_url: env::var("SMS_GATEWAY_URL").ok().filter(|s| !s.is_empty()),
            sms_gateway_api_key: env::var("SMS_GATEWAY_API_KEY").ok().filter(|s| !s.is_empty()),
            http_timeout_seconds: env::var("HTTP_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".into())
                .parse()?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}
