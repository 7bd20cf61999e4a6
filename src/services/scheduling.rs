use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::{Connection, TransactionBehavior};

use crate::config::AppConfig;
use crate::db::{self, queries};
use crate::errors::AppError;
use crate::models::availability::{parse_date, parse_time};
use crate::models::{Booking, BookingStatus, NewBooking, TimeSlot};
use crate::services::availability::{compute_available_slots, stored_index_for_date};

/// Loads the day's hours and bookings and runs the slot calculator.
pub fn available_slots_for_date(
    conn: &Connection,
    date: NaiveDate,
    config: &AppConfig,
    now: NaiveDateTime,
) -> Result<Vec<TimeSlot>, AppError> {
    let hours = queries::get_business_hours_for_day(conn, stored_index_for_date(date))?;
    let bookings = queries::get_bookings_for_date(conn, &date.format("%Y-%m-%d").to_string())?;
    let rules = config.slot_rules(hours.as_ref().map(|h| h.interval_minutes));
    compute_available_slots(date, hours.as_ref(), &bookings, &rules, now)
}

/// Re-checks a requested start against stored state. Must run inside the
/// same transaction as the insert it guards.
pub fn validate_booking_slot(
    conn: &Connection,
    date: NaiveDate,
    time: NaiveTime,
    config: &AppConfig,
    now: NaiveDateTime,
) -> Result<(), AppError> {
    let hours = queries::get_business_hours_for_day(conn, stored_index_for_date(date))?;
    let rules = config.slot_rules(hours.as_ref().map(|h| h.interval_minutes));

    let grid = compute_available_slots(date, hours.as_ref(), &[], &rules, now)?;
    if !grid.iter().any(|slot| slot.start == time) {
        return Err(AppError::InvalidArgument(format!(
            "{} on {} is not a bookable time",
            time.format("%H:%M"),
            date.format("%Y-%m-%d")
        )));
    }

    let open = available_slots_for_date(conn, date, config, now)?;
    if !open.iter().any(|slot| slot.start == time) {
        return Err(AppError::Conflict(
            "this time slot is already booked".to_string(),
        ));
    }

    Ok(())
}

pub fn create_booking(
    conn: &mut Connection,
    request: NewBooking,
    config: &AppConfig,
    now: NaiveDateTime,
) -> Result<Booking, AppError> {
    let customer_name = request.customer_name.trim();
    let phone = request.phone.trim();
    if customer_name.is_empty() {
        return Err(AppError::InvalidArgument("customer_name is required".to_string()));
    }
    if phone.is_empty() {
        return Err(AppError::InvalidArgument("phone is required".to_string()));
    }
    let date = parse_date(&request.date)?;
    let time = parse_time(&request.time)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let service = queries::get_service(&tx, &request.service_id)?
        .filter(|s| s.active)
        .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;

    validate_booking_slot(&tx, date, time, config, now)?;

    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        customer_name: customer_name.to_string(),
        phone: phone.to_string(),
        service_id: service.id,
        service_name: service.name,
        date: date.format("%Y-%m-%d").to_string(),
        time: time.format("%H:%M").to_string(),
        status: BookingStatus::Pending,
        created_at: Utc::now().to_rfc3339(),
    };

    queries::create_booking(&tx, &booking).map_err(|e| {
        if db::is_constraint_violation(&e) {
            AppError::Conflict("this time slot is already booked".to_string())
        } else {
            AppError::Internal(e)
        }
    })?;
    tx.commit()?;

    tracing::info!(
        booking_id = %booking.id,
        date = %booking.date,
        time = %booking.time,
        service = %booking.service_name,
        "booking created"
    );

    Ok(booking)
}

/// Moves a booking to `status` and returns it as stored afterwards.
pub fn set_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> Result<Booking, AppError> {
    let mut booking = queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound("booking not found".to_string()))?;

    let updated = queries::update_booking_status(conn, id, status).map_err(|e| {
        if db::is_constraint_violation(&e) {
            AppError::Conflict("another booking already holds this time slot".to_string())
        } else {
            AppError::Internal(e)
        }
    })?;
    if !updated {
        return Err(AppError::NotFound("booking not found".to_string()));
    }

    tracing::info!(
        booking_id = %id,
        from = booking.status.as_str(),
        to = status.as_str(),
        "booking status updated"
    );
    booking.status = status;
    Ok(booking)
}
