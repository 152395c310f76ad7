use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use menu_notifier::{
    config::Config,
    routes,
    services::{menu::MenuFetcher, notifications::SmsNotifier},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    let notifier = SmsNotifier::from_config(&config)?;
    if notifier.is_configured() {
        info!("SMS gateway configured");
    } else {
        info!("SMS gateway not configured, notifications will be skipped");
    }

    let menus = Arc::new(MenuFetcher::from_config(&config, Arc::new(notifier))?);

    let state = AppState {
        config: config.clone(),
        menus,
    };

    let app = routes::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("menu-notifier API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
