#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, http::Uri, routing::get, Router};
use serde_json::{json, Value};

use menu_notifier::{
    models::notification::{MessageAttributes, NotificationTarget},
    services::{menu::MenuFetcher, notifications::Notifier},
};

pub const DESTINATION: &str = "+15550100";

// ─── Upstream mock ───────────────────────────────────────────────────────────

#[derive(Clone)]
struct UpstreamState {
    status: StatusCode,
    body: Arc<String>,
    hits: Arc<AtomicUsize>,
    paths: Arc<Mutex<Vec<String>>>,
}

/// A local stand-in for the Nutrislice weeks endpoint.
pub struct Upstream {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    paths: Arc<Mutex<Vec<String>>>,
}

impl Upstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

async fn week(State(state): State<UpstreamState>, uri: Uri) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.paths.lock().unwrap().push(uri.path().to_string());
    (state.status, state.body.as_str().to_string())
}

pub async fn spawn_upstream(status: StatusCode, body: impl Into<String>) -> Upstream {
    let state = UpstreamState {
        status,
        body: Arc::new(body.into()),
        hits: Arc::new(AtomicUsize::new(0)),
        paths: Arc::new(Mutex::new(Vec::new())),
    };
    let hits = state.hits.clone();
    let paths = state.paths.clone();

    let app = Router::new()
        .route(
            "/menu/api/weeks/school/{school}/menu-type/{menu_type}/{*date}",
            get(week),
        )
        .with_state(state);

    let base_url = serve(app).await;
    Upstream {
        base_url,
        hits,
        paths,
    }
}

pub async fn spawn_json_upstream(body: Value) -> Upstream {
    spawn_upstream(StatusCode::OK, body.to_string()).await
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// ─── Notifiers ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub message: String,
    pub phone_number: String,
    pub attributes: MessageAttributes,
}

#[derive(Default)]
pub struct RecordingNotifier {
    published: Mutex<Vec<Published>>,
}

impl RecordingNotifier {
    pub fn published(&self) -> Vec<Published> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(
        &self,
        message: &str,
        phone_number: &str,
        attributes: &MessageAttributes,
    ) -> anyhow::Result<()> {
        self.published.lock().unwrap().push(Published {
            message: message.to_string(),
            phone_number: phone_number.to_string(),
            attributes: attributes.clone(),
        });
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn publish(&self, _: &str, _: &str, _: &MessageAttributes) -> anyhow::Result<()> {
        anyhow::bail!("gateway rejected the message")
    }
}

pub struct StalledNotifier;

#[async_trait]
impl Notifier for StalledNotifier {
    async fn publish(&self, _: &str, _: &str, _: &MessageAttributes) -> anyhow::Result<()> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

pub fn target() -> NotificationTarget {
    NotificationTarget {
        phone_number: DESTINATION.to_string(),
        attributes: MessageAttributes {
            sender_id: "LINDBERGH".to_string(),
            sms_type: "Transactional".to_string(),
        },
    }
}

pub fn fetcher(base_url: &str, notifier: Arc<dyn Notifier>) -> MenuFetcher {
    MenuFetcher::new(base_url, Duration::from_millis(500), notifier, target()).unwrap()
}

pub fn full_nutrition(seed: i64) -> Value {
    json!({
        "calories": 300 + seed,
        "g_fat": 12 + seed,
        "g_saturated_fat": 5 + seed,
        "g_trans_fat": 0,
        "mg_cholesterol": 25 + seed,
        "g_carbs": 40 + seed,
        "g_sugar": 6 + seed,
        "mg_sodium": 640 + seed,
        "mg_potassium": 180 + seed,
        "g_protein": 14 + seed,
        "g_fiber": 3 + seed,
        "mg_iron": 2.5,
        "mg_calcium": 200 + seed,
        "iu_vitamin_a": 150 + seed,
        "mg_vitamin_c": 1.2,
        "mg_vitamin_d": 0.1
    })
}

/// A week with two fully described items on 2023-05-17 and one on the 18th.
pub fn week_fixture() -> Value {
    json!({
        "start_date": "2023-05-14",
        "days": [
            {
                "date": "2023-05-16",
                "menu_items": [
                    { "food": { "name": "Tacos", "rounded_nutrition_info": full_nutrition(9) } }
                ]
            },
            {
                "date": "2023-05-17",
                "menu_items": [
                    { "text": "Entrees", "food": null },
                    {
                        "food": {
                            "name": "Cheese Pizza",
                            "rounded_nutrition_info": full_nutrition(0),
                            "serving_size_info": { "serving_size_amount": "1", "serving_size_unit": "slice" },
                            "image_url": "https://images.example/pizza.png"
                        }
                    },
                    {
                        "food": {
                            "name": "Garden Salad",
                            "rounded_nutrition_info": full_nutrition(1),
                            "serving_size_info": { "serving_size_amount": "2", "serving_size_unit": "cup" },
                            "image_url": "https://images.example/salad.png"
                        }
                    }
                ]
            }
        ]
    })
}
