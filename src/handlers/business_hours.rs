use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::auth::require_admin;
use crate::models::availability::parse_time;
use crate::models::{BusinessHours, BusinessHoursUpdate};
use crate::state::AppState;

// GET /api/business-hours
pub async fn list_business_hours(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BusinessHours>>, AppError> {
    let db = state.db()?;
    Ok(Json(queries::get_business_hours(&db)?))
}

// PUT /api/business-hours/:day
pub async fn update_business_hours(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(day): Path<i64>,
    Json(body): Json<BusinessHoursUpdate>,
) -> Result<Json<BusinessHours>, AppError> {
    require_admin(&headers, &state.config)?;

    if !(0..=6).contains(&day) {
        return Err(AppError::InvalidArgument(format!("invalid day of week: {day}")));
    }

    let db = state.db()?;
    let mut hours = queries::get_business_hours_for_day(&db, day as u8)?
        .ok_or_else(|| AppError::NotFound("business hours not found".to_string()))?;

    apply_update(&mut hours, body)?;
    queries::save_business_hours(&db, &hours)?;

    tracing::info!(
        day = hours.day_name(),
        is_open = hours.is_open,
        open_time = %hours.open_time,
        close_time = %hours.close_time,
        "business hours updated"
    );

    Ok(Json(hours))
}

fn apply_update(hours: &mut BusinessHours, update: BusinessHoursUpdate) -> Result<(), AppError> {
    if let Some(open) = update.open_time {
        parse_time(&open)?;
        hours.open_time = open.trim().to_string();
    }
    if let Some(close) = update.close_time {
        parse_time(&close)?;
        hours.close_time = close.trim().to_string();
    }
    if let Some(interval) = update.interval_minutes {
        if interval <= 0 {
            return Err(AppError::InvalidArgument(format!(
                "interval_minutes must be positive, got {interval}"
            )));
        }
        hours.interval_minutes = interval;
    }
    hours.is_open = update.is_open;

    if hours.is_open {
        let open = parse_time(&hours.open_time)?;
        let close = parse_time(&hours.close_time)?;
        if open >= close {
            return Err(AppError::InvalidArgument(format!(
                "open_time {} must be before close_time {}",
                hours.open_time, hours.close_time
            )));
        }
    }
    Ok(())
}
