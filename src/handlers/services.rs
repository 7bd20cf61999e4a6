use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::auth::require_admin;
use crate::models::service::validate_price;
use crate::models::{NewService, Service, ServiceUpdate};
use crate::state::AppState;

// GET /api/services
#[derive(Deserialize)]
pub struct ServicesQuery {
    pub active_only: Option<bool>,
}

pub async fn list_services(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ServicesQuery>,
) -> Result<Json<Vec<Service>>, AppError> {
    let db = state.db()?;
    let services = queries::get_services(&db, query.active_only.unwrap_or(true))?;
    Ok(Json(services))
}

// POST /api/services
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewService>,
) -> Result<Json<Service>, AppError> {
    require_admin(&headers, &state.config)?;

    if body.name.trim().is_empty() {
        return Err(AppError::InvalidArgument("name is required".to_string()));
    }
    validate_price(body.price).map_err(AppError::InvalidArgument)?;

    let service = Service {
        id: uuid::Uuid::new_v4().to_string(),
        name: body.name.trim().to_string(),
        description: body.description,
        price: body.price,
        image_url: body.image_url,
        active: true,
        created_at: Utc::now().to_rfc3339(),
    };

    let db = state.db()?;
    queries::create_service(&db, &service)?;
    tracing::info!(service_id = %service.id, name = %service.name, "service created");

    Ok(Json(service))
}

// PUT /api/services/:id
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ServiceUpdate>,
) -> Result<Json<Service>, AppError> {
    require_admin(&headers, &state.config)?;

    if let Some(price) = body.price {
        validate_price(price).map_err(AppError::InvalidArgument)?;
    }
    if matches!(body.name.as_deref(), Some(name) if name.trim().is_empty()) {
        return Err(AppError::InvalidArgument("name cannot be empty".to_string()));
    }

    let db = state.db()?;
    let mut service = queries::get_service(&db, &id)?
        .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;
    service.apply(body);
    queries::update_service(&db, &service)?;

    Ok(Json(service))
}

// DELETE /api/services/:id
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&headers, &state.config)?;

    let db = state.db()?;
    if !queries::delete_service(&db, &id)? {
        return Err(AppError::NotFound("service not found".to_string()));
    }
    tracing::info!(service_id = %id, "service deleted");

    Ok(Json(serde_json::json!({ "message": "Service deleted" })))
}
