use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::auth::require_admin;
use crate::models::availability::parse_date;
use crate::models::{Booking, BookingStatus, NewBooking};
use crate::services::availability::{hours_for_date, is_date_disabled};
use crate::services::scheduling;
use crate::state::AppState;

// GET /api/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub limit: Option<i64>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    require_admin(&headers, &state.config)?;

    let limit = query.limit.unwrap_or(1000);
    let db = state.db()?;
    let bookings = queries::get_all_bookings(&db, limit)?;
    Ok(Json(bookings))
}

// POST /api/bookings
#[derive(Serialize)]
pub struct CreatedBooking {
    #[serde(flatten)]
    booking: Booking,
    whatsapp_number: String,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewBooking>,
) -> Result<Json<CreatedBooking>, AppError> {
    let now = Local::now().naive_local();
    let mut db = state.db()?;
    let booking = scheduling::create_booking(&mut db, body, &state.config, now)?;

    let whatsapp_number = queries::get_settings(&db)?
        .map(|s| s.whatsapp_number)
        .unwrap_or_else(|| state.config.default_whatsapp_number.clone());

    Ok(Json(CreatedBooking {
        booking,
        whatsapp_number,
    }))
}

// GET /api/bookings/available-slots
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: String,
    pub service_id: Option<String>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    available_slots: Vec<String>,
}

pub async fn available_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = parse_date(&query.date)?;
    let now = Local::now().naive_local();

    let db = state.db()?;
    if let Some(service_id) = query.service_id.as_deref().filter(|s| !s.is_empty()) {
        queries::get_service(&db, service_id)?
            .filter(|s| s.active)
            .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;
    }

    let slots = scheduling::available_slots_for_date(&db, date, &state.config, now)?;
    tracing::debug!(date = %query.date, count = slots.len(), "computed available slots");

    Ok(Json(SlotsResponse {
        available_slots: slots.iter().map(|s| s.label()).collect(),
    }))
}

// GET /api/bookings/date-status
#[derive(Deserialize)]
pub struct DateQuery {
    pub date: String,
}

#[derive(Serialize)]
pub struct DateStatusResponse {
    date: String,
    disabled: bool,
}

pub async fn date_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DateStatusResponse>, AppError> {
    let date = parse_date(&query.date)?;
    let now = Local::now().naive_local();
    let hours = {
        let db = state.db()?;
        queries::get_business_hours(&db)?
    };
    let rules = state
        .config
        .slot_rules(hours_for_date(date, &hours).map(|h| h.interval_minutes));

    Ok(Json(DateStatusResponse {
        date: date.format("%Y-%m-%d").to_string(),
        disabled: is_date_disabled(date, &hours, &rules, now),
    }))
}

// PUT /api/bookings/:id/status
#[derive(Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&headers, &state.config)?;

    let status = BookingStatus::parse(&query.status)
        .ok_or_else(|| AppError::InvalidArgument(format!("invalid status: {}", query.status)))?;

    let db = state.db()?;
    scheduling::set_booking_status(&db, &id, status)?;

    Ok(Json(serde_json::json!({ "message": "Status updated" })))
}
