use std::{sync::Arc, time::Duration};

use axum::http::StatusCode;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    config::Config,
    models::{
        menu::{Food, MenuItem, MenuResult, MenuType, WeekDocument, NUTRIENT_KEYS},
        notification::NotificationTarget,
    },
    services::{
        metrics::{MENU_FALLBACKS_COUNTER, MENU_FETCHES_COUNTER, NOTIFICATION_FAILURES_COUNTER},
        notifications::Notifier,
    },
};

pub const INVALID_MENU_TYPE_MESSAGE: &str =
    "Menu type is not available! Please provide a valid menu type";

pub const FALLBACK_MESSAGE: &str =
    "Due to an absence of data for today on the website, the following is a dummy dataset.";

const REQUEST_DATE_FORMAT: &str = "%Y/%m/%d";
const UPSTREAM_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Menu type is not available: {0}")]
    InvalidMenuType(String),

    #[error("Date should be in format 'YYYY/MM/DD', e.g. '2023/05/17' (got {0:?})")]
    MalformedInput(String),

    #[error("Upstream menu service unavailable: {0}")]
    UpstreamUnavailable(#[from] reqwest::Error),

    #[error("Upstream menu data is invalid: {0}")]
    DataIntegrityViolation(String),
}

impl MenuError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MenuError::InvalidMenuType(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MenuError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            MenuError::UpstreamUnavailable(_) | MenuError::DataIntegrityViolation(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    fn outcome_label(&self) -> &'static str {
        match self {
            MenuError::InvalidMenuType(_) => "invalid_menu_type",
            MenuError::MalformedInput(_) => "malformed_input",
            MenuError::UpstreamUnavailable(_) => "upstream_unavailable",
            MenuError::DataIntegrityViolation(_) => "data_integrity_violation",
        }
    }
}

/// Error structure returned to invokers: `{"statusCode": 500, "body": "\"...\""}`.
/// `body` is the JSON encoding of the message string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl From<&MenuError> for ErrorResponse {
    fn from(err: &MenuError) -> Self {
        let message = match err {
            MenuError::InvalidMenuType(_) => INVALID_MENU_TYPE_MESSAGE.to_string(),
            other => other.to_string(),
        };
        Self {
            status_code: err.status_code().as_u16(),
            body: Value::String(message).to_string(),
        }
    }
}

/// Retrieves one day's menu from Nutrislice, normalizes it and notifies the
/// configured destination.
pub struct MenuFetcher {
    client: Client,
    base_url: String,
    notifier: Arc<dyn Notifier>,
    target: NotificationTarget,
    notify_timeout: Duration,
}

impl MenuFetcher {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        notifier: Arc<dyn Notifier>,
        target: NotificationTarget,
    ) -> anyhow::Result<Self> {
        let base_url: String = base_url.into();
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            notifier,
            target,
            notify_timeout: timeout,
        })
    }

    pub fn from_config(config: &Config, notifier: Arc<dyn Notifier>) -> anyhow::Result<Self> {
        Self::new(
            config.nutrislice_base_url.clone(),
            config.http_timeout(),
            notifier,
            NotificationTarget::from_config(config),
        )
    }

    pub async fn fetch(
        &self,
        date: &str,
        school_slug: &str,
        menu_type: &str,
    ) -> Result<MenuResult, MenuError> {
        let outcome = self.fetch_inner(date, school_slug, menu_type).await;

        let type_label = match menu_type.parse::<MenuType>() {
            Ok(t) => t.as_str(),
            Err(_) => "invalid",
        };
        let outcome_label = match &outcome {
            Ok(result) if result.message.is_empty() => "live",
            Ok(_) => "fallback",
            Err(e) => e.outcome_label(),
        };
        MENU_FETCHES_COUNTER
            .with_label_values(&[type_label, outcome_label])
            .inc();

        outcome
    }

    async fn fetch_inner(
        &self,
        date: &str,
        school_slug: &str,
        menu_type: &str,
    ) -> Result<MenuResult, MenuError> {
        let menu_type: MenuType = menu_type.parse().map_err(MenuError::InvalidMenuType)?;

        let formatted_date = normalize_date(date).map_err(|e| {
            tracing::warn!("{}", e);
            e
        })?;

        let url = week_url(&self.base_url, school_slug, menu_type, date);
        tracing::info!("Fetching {} menu for {} on {}", menu_type, school_slug, formatted_date);

        let week = self.fetch_week(&url).await.map_err(|e| {
            tracing::error!("Error fetching {}: {}", url, e);
            e
        })?;

        let items = select_menu_items(&week, &formatted_date)?;
        if items.is_empty() {
            tracing::info!(
                "No {} items for {} on {}, serving placeholder menu",
                menu_type,
                school_slug,
                formatted_date
            );
            MENU_FALLBACKS_COUNTER
                .with_label_values(&[menu_type.as_str()])
                .inc();
        }

        let result = build_result(date, items);
        self.notify(&result).await;

        Ok(result)
    }

    async fn fetch_week(&self, url: &str) -> Result<WeekDocument, MenuError> {
        let week = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<WeekDocument>()
            .await?;
        Ok(week)
    }

    /// Fire-and-forget: delivery problems are logged and counted, never returned.
    async fn notify(&self, result: &MenuResult) {
        let message = match serde_json::to_string(result) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Could not serialize menu for notification: {}", e);
                return;
            }
        };

        let delivery = self.notifier.publish(
            &message,
            &self.target.phone_number,
            &self.target.attributes,
        );

        match tokio::time::timeout(self.notify_timeout, delivery).await {
            Ok(Ok(())) => tracing::debug!("Menu notification sent to {}", self.target.phone_number),
            Ok(Err(e)) => {
                NOTIFICATION_FAILURES_COUNTER.with_label_values(&["error"]).inc();
                tracing::warn!("Menu notification failed: {}", e);
            }
            Err(_) => {
                NOTIFICATION_FAILURES_COUNTER.with_label_values(&["timeout"]).inc();
                tracing::warn!(
                    "Menu notification timed out after {}s",
                    self.notify_timeout.as_secs()
                );
            }
        }
    }
}

/// `2023/05/17` -> `2023-05-17`.
pub fn normalize_date(date: &str) -> Result<String, MenuError> {
    NaiveDate::parse_from_str(date, REQUEST_DATE_FORMAT)
        .map(|d| d.format(UPSTREAM_DATE_FORMAT).to_string())
        .map_err(|_| MenuError::MalformedInput(date.to_string()))
}

/// The weeks endpoint takes the request date as given (slashes included); only
/// day matching uses the reformatted date.
pub fn week_url(base_url: &str, school_slug: &str, menu_type: MenuType, date: &str) -> String {
    format!("{base_url}/menu/api/weeks/school/{school_slug}/menu-type/{menu_type}/{date}")
}

/// Normalized items of every day dated `formatted_date`, in document order.
pub fn select_menu_items(
    week: &WeekDocument,
    formatted_date: &str,
) -> Result<Vec<MenuItem>, MenuError> {
    let mut items = Vec::new();
    for day in week.days.iter().filter(|d| d.date == formatted_date) {
        for entry in &day.menu_items {
            if let Some(item) = entry.food.as_ref().map(normalize_food).transpose()?.flatten() {
                items.push(item);
            }
        }
    }
    Ok(items)
}

/// `Ok(None)` for rows whose food payload is empty: `null`, `false`, `0`,
/// `""`, `[]` or `{}`.
fn normalize_food(payload: &Value) -> Result<Option<MenuItem>, MenuError> {
    match payload {
        Value::Null | Value::Bool(false) => return Ok(None),
        Value::Number(n) if n.as_f64() == Some(0.0) => return Ok(None),
        Value::String(s) if s.is_empty() => return Ok(None),
        Value::Array(a) if a.is_empty() => return Ok(None),
        Value::Object(map) if map.is_empty() => return Ok(None),
        Value::Object(_) => {}
        other => {
            return Err(MenuError::DataIntegrityViolation(format!(
                "food payload is not an object: {other}"
            )))
        }
    }

    let food: Food = serde_json::from_value(payload.clone())
        .map_err(|e| MenuError::DataIntegrityViolation(e.to_string()))?;

    let name = food
        .name
        .ok_or_else(|| MenuError::DataIntegrityViolation("food item without a name".into()))?;

    let nutrition = food.rounded_nutrition_info.unwrap_or_default();
    let mut nutrients = Map::new();
    for (code, label) in NUTRIENT_KEYS {
        let value = match nutrition.get(code) {
            None | Some(Value::Null) => Value::from(0),
            Some(v) => v.clone(),
        };
        nutrients.insert(label.to_string(), value);
    }

    let serving = food.serving_size_info.unwrap_or_default();
    let serving_size = format!(
        "{} {}",
        serving_part(serving.serving_size_amount.as_ref()),
        serving_part(serving.serving_size_unit.as_ref())
    );

    Ok(Some(MenuItem {
        name,
        nutrients,
        serving_size,
        image_url: food.image_url.unwrap_or_default(),
    }))
}

fn serving_part(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => " ".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

const PLACEHOLDER_NUTRIENTS: [(&str, i64); 16] = [
    ("Calories", 10),
    ("Total Fat (g)", 10),
    ("Saturated Fat (g)", 20),
    ("Trans Fat (g)", 10),
    ("Cholesterol (mg)", 20),
    ("Total Carbs (g)", 10),
    ("Sugar (g)", 20),
    ("Sodium (mg)", 10),
    ("Potassium (mg)", 20),
    ("Protein (g)", 10),
    ("Dietary Fiber (g)", 20),
    ("Iron (mg)", 10),
    ("Calcium (mg)", 20),
    ("Vitamin A (mg)", 10),
    ("Vitamin C (mg)", 20),
    ("Vitamin D (mg)", 10),
];

/// The item served when upstream has nothing for the requested day.
pub fn placeholder_item() -> MenuItem {
    let mut nutrients = Map::new();
    for (label, value) in PLACEHOLDER_NUTRIENTS {
        nutrients.insert(label.to_string(), Value::from(value));
    }

    MenuItem {
        name: "Double chocolate".to_string(),
        nutrients,
        serving_size: "10 g".to_string(),
        image_url: String::new(),
    }
}

pub fn build_result(date: &str, items: Vec<MenuItem>) -> MenuResult {
    if items.is_empty() {
        MenuResult {
            date: date.to_string(),
            message: FALLBACK_MESSAGE.to_string(),
            menu: vec![placeholder_item()],
        }
    } else {
        MenuResult {
            date: date.to_string(),
            message: String::new(),
            menu: items,
        }
    }
}
