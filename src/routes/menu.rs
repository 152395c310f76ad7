use axum::{extract::State, http::StatusCode, Json};

use crate::{
    models::menu::{MenuRequest, MenuResult},
    services::menu::ErrorResponse,
    AppState,
};

/// POST /invoke, body `{ "date": "2023/05/17", "school_slug": "...", "menu_type": "lunch" }`
pub async fn invoke(
    State(state): State<AppState>,
    Json(req): Json<MenuRequest>,
) -> Result<Json<MenuResult>, (StatusCode, Json<ErrorResponse>)> {
    state
        .menus
        .fetch(&req.date, &req.school_slug, &req.menu_type)
        .await
        .map(Json)
        .map_err(|e| (e.status_code(), Json(ErrorResponse::from(&e))))
}
