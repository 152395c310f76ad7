// Library exports for binary tools and tests
pub mod config;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use config::Config;
use services::menu::MenuFetcher;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub menus: Arc<MenuFetcher>,
}
