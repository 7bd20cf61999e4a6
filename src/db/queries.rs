use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Booking, BookingStatus, BusinessHours, Service, Settings};

// ── Services ──

const SERVICE_COLUMNS: &str = "id, name, description, price, image_url, active, created_at";

fn parse_service_row(row: &rusqlite::Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        image_url: row.get(4)?,
        active: row.get::<_, i32>(5)? != 0,
        created_at: row.get(6)?,
    })
}

pub fn get_services(conn: &Connection, active_only: bool) -> anyhow::Result<Vec<Service>> {
    let sql = if active_only {
        format!("SELECT {SERVICE_COLUMNS} FROM services WHERE active = 1 ORDER BY created_at ASC, name ASC")
    } else {
        format!("SELECT {SERVICE_COLUMNS} FROM services ORDER BY created_at ASC, name ASC")
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], parse_service_row)?;

    let mut services = vec![];
    for row in rows {
        services.push(row?);
    }
    Ok(services)
}

pub fn get_service(conn: &Connection, id: &str) -> anyhow::Result<Option<Service>> {
    let service = conn
        .query_row(
            &format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = ?1"),
            params![id],
            parse_service_row,
        )
        .optional()?;
    Ok(service)
}

pub fn create_service(conn: &Connection, service: &Service) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO services (id, name, description, price, image_url, active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            service.id,
            service.name,
            service.description,
            service.price,
            service.image_url,
            service.active as i32,
            service.created_at,
        ],
    )?;
    Ok(())
}

pub fn update_service(conn: &Connection, service: &Service) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE services SET name = ?1, description = ?2, price = ?3, image_url = ?4, active = ?5
         WHERE id = ?6",
        params![
            service.name,
            service.description,
            service.price,
            service.image_url,
            service.active as i32,
            service.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_service(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM services WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Bookings ──

const BOOKING_COLUMNS: &str =
    "id, customer_name, phone, service_id, service_name, date, time, status, created_at";

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let status_str: String = row.get(7)?;
    Ok(Booking {
        id: row.get(0)?,
        customer_name: row.get(1)?,
        phone: row.get(2)?,
        service_id: row.get(3)?,
        service_name: row.get(4)?,
        date: row.get(5)?,
        time: row.get(6)?,
        status: BookingStatus::parse(&status_str).unwrap_or(BookingStatus::Pending),
        created_at: row.get(8)?,
    })
}

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, customer_name, phone, service_id, service_name, date, time, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            booking.id,
            booking.customer_name,
            booking.phone,
            booking.service_id,
            booking.service_name,
            booking.date,
            booking.time,
            booking.status.as_str(),
            booking.created_at,
        ],
    )?;
    Ok(())
}

/// Every booking on `date`, whatever its status.
pub fn get_bookings_for_date(conn: &Connection, date: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE date = ?1 ORDER BY time ASC"
    ))?;
    let rows = stmt.query_map(params![date], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn get_all_bookings(conn: &Connection, limit: i64) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY date DESC, time DESC LIMIT ?1"
    ))?;
    let rows = stmt.query_map(params![limit], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let booking = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
            params![id],
            parse_booking_row,
        )
        .optional()?;
    Ok(booking)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

// ── Business Hours ──

fn parse_hours_row(row: &rusqlite::Row) -> rusqlite::Result<BusinessHours> {
    Ok(BusinessHours {
        day_of_week: row.get(0)?,
        open_time: row.get(1)?,
        close_time: row.get(2)?,
        is_open: row.get::<_, i32>(3)? != 0,
        interval_minutes: row.get(4)?,
    })
}

pub fn get_business_hours(conn: &Connection) -> anyhow::Result<Vec<BusinessHours>> {
    let mut stmt = conn.prepare(
        "SELECT day_of_week, open_time, close_time, is_open, interval_minutes
         FROM business_hours ORDER BY day_of_week ASC",
    )?;
    let rows = stmt.query_map([], parse_hours_row)?;

    let mut hours = vec![];
    for row in rows {
        hours.push(row?);
    }
    Ok(hours)
}

pub fn get_business_hours_for_day(
    conn: &Connection,
    day_of_week: u8,
) -> anyhow::Result<Option<BusinessHours>> {
    let hours = conn
        .query_row(
            "SELECT day_of_week, open_time, close_time, is_open, interval_minutes
             FROM business_hours WHERE day_of_week = ?1",
            params![day_of_week],
            parse_hours_row,
        )
        .optional()?;
    Ok(hours)
}

pub fn save_business_hours(conn: &Connection, hours: &BusinessHours) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO business_hours (day_of_week, open_time, close_time, is_open, interval_minutes)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(day_of_week) DO UPDATE SET
           open_time = excluded.open_time,
           close_time = excluded.close_time,
           is_open = excluded.is_open,
           interval_minutes = excluded.interval_minutes",
        params![
            hours.day_of_week,
            hours.open_time,
            hours.close_time,
            hours.is_open as i32,
            hours.interval_minutes,
        ],
    )?;
    Ok(())
}

// ── Settings ──

pub fn get_settings(conn: &Connection) -> anyhow::Result<Option<Settings>> {
    let settings = conn
        .query_row(
            "SELECT whatsapp_number, updated_at FROM settings WHERE id = 1",
            [],
            |row| {
                Ok(Settings {
                    whatsapp_number: row.get(0)?,
                    updated_at: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(settings)
}

pub fn save_settings(conn: &Connection, whatsapp_number: &str) -> anyhow::Result<Settings> {
    let updated_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO settings (id, whatsapp_number, updated_at) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET
           whatsapp_number = excluded.whatsapp_number,
           updated_at = excluded.updated_at",
        params![whatsapp_number, updated_at],
    )?;
    Ok(Settings {
        whatsapp_number: whatsapp_number.to_string(),
        updated_at,
    })
}
