use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::state::AppState;

/// Rejects requests whose bearer token is not the configured admin token.
pub fn require_admin(headers: &HeaderMap, config: &AppConfig) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != config.admin_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// POST /api/auth/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    access_token: String,
    token_type: &'static str,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let config = &state.config;
    if body.username != config.admin_username || body.password != config.admin_password {
        tracing::warn!(username = %body.username, "rejected admin login");
        return Err(AppError::Unauthorized);
    }

    tracing::info!(username = %body.username, "admin logged in");
    Ok(Json(TokenResponse {
        access_token: config.admin_token.clone(),
        token_type: "bearer",
    }))
}
