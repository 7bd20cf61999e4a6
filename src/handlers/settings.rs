use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::auth::require_admin;
use crate::models::{Settings, SettingsUpdate};
use crate::state::AppState;

// GET /api/settings
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Result<Json<Settings>, AppError> {
    let db = state.db()?;
    let settings = queries::get_settings(&db)?.unwrap_or_else(|| Settings {
        whatsapp_number: state.config.default_whatsapp_number.clone(),
        updated_at: String::new(),
    });
    Ok(Json(settings))
}

// PUT /api/settings
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<SettingsUpdate>,
) -> Result<Json<Settings>, AppError> {
    require_admin(&headers, &state.config)?;

    let number = body.whatsapp_number.trim();
    if number.is_empty() {
        return Err(AppError::InvalidArgument("whatsapp_number is required".to_string()));
    }

    let db = state.db()?;
    let settings = queries::save_settings(&db, number)?;
    Ok(Json(settings))
}
