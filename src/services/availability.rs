use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::errors::AppError;
use crate::models::availability::parse_time;
use crate::models::{Booking, BookingStatus, BusinessHours, TimeSlot};

/// How candidate slots are generated and filtered for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRules {
    /// Step between candidate starts, and the length each slot must fit.
    pub slot_minutes: u32,
    /// When false, cancelled bookings free their slot.
    pub cancelled_blocks_slot: bool,
    /// When true, starts earlier than `now` on today's date are dropped.
    pub hide_past_slots: bool,
}

impl SlotRules {
    pub fn new(slot_minutes: u32) -> Self {
        Self {
            slot_minutes,
            cancelled_blocks_slot: false,
            hide_past_slots: false,
        }
    }
}

/// Maps a calendar weekday (0 = Sunday .. 6 = Saturday) to the stored
/// Monday-first index (0 = Monday .. 6 = Sunday).
pub fn calendar_weekday_to_stored_index(calendar_weekday: u32) -> u8 {
    match calendar_weekday % 7 {
        0 => 6,
        d => (d - 1) as u8,
    }
}

pub fn stored_index_for_date(date: NaiveDate) -> u8 {
    calendar_weekday_to_stored_index(date.weekday().num_days_from_sunday())
}

pub fn hours_for_date(date: NaiveDate, hours: &[BusinessHours]) -> Option<&BusinessHours> {
    let index = stored_index_for_date(date);
    hours.iter().find(|h| h.day_of_week == index)
}

/// True when the calendar should grey out `date`: the mapped entry is missing,
/// closed or unusable, or `rules` leave the day without a single candidate.
/// A date is disabled exactly when [`compute_available_slots`] with no
/// bookings returns nothing for it.
pub fn is_date_disabled(
    date: NaiveDate,
    hours: &[BusinessHours],
    rules: &SlotRules,
    now: NaiveDateTime,
) -> bool {
    compute_available_slots(date, hours_for_date(date, hours), &[], rules, now)
        .map(|slots| slots.is_empty())
        .unwrap_or(true)
}

/// Parsed `(open, close)` for an open day, or `None` when the entry is closed
/// or its window is unusable.
fn opening_window(hours: &BusinessHours) -> Option<(NaiveTime, NaiveTime)> {
    if !hours.is_open {
        return None;
    }
    let (open, close) = match (parse_time(&hours.open_time), parse_time(&hours.close_time)) {
        (Ok(open), Ok(close)) => (open, close),
        _ => {
            tracing::warn!(
                day = hours.day_of_week,
                open_time = %hours.open_time,
                close_time = %hours.close_time,
                "malformed business hours, treating day as closed"
            );
            return None;
        }
    };
    if open >= close {
        tracing::warn!(
            day = hours.day_of_week,
            open_time = %hours.open_time,
            close_time = %hours.close_time,
            "business hours open at or after close, treating day as closed"
        );
        return None;
    }
    Some((open, close))
}

fn minutes_of(t: NaiveTime) -> u32 {
    t.num_seconds_from_midnight() / 60
}

fn time_of(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Every slot the day's window can hold, ignoring bookings and the clock.
pub fn candidate_slots(hours: &BusinessHours, slot_minutes: u32) -> Result<Vec<TimeSlot>, AppError> {
    if slot_minutes == 0 {
        return Err(AppError::InvalidArgument(
            "slot duration must be greater than zero".to_string(),
        ));
    }
    let Some((open, close)) = opening_window(hours) else {
        return Ok(Vec::new());
    };

    let close_minutes = minutes_of(close);
    let mut start = minutes_of(open);
    let mut slots = Vec::new();
    while let Some(end) = start.checked_add(slot_minutes).filter(|end| *end <= close_minutes) {
        if let (Some(s), Some(e)) = (time_of(start), time_of(end)) {
            slots.push(TimeSlot { start: s, end: e });
        }
        start = end;
    }
    Ok(slots)
}

/// Ordered bookable slots for `date`.
///
/// `existing` should hold the bookings stored for that date. A booking blocks
/// the candidate whose start equals its time; intervals are not checked for
/// overlap. Bookings with an unparseable time block nothing.
pub fn compute_available_slots(
    date: NaiveDate,
    hours: Option<&BusinessHours>,
    existing: &[Booking],
    rules: &SlotRules,
    now: NaiveDateTime,
) -> Result<Vec<TimeSlot>, AppError> {
    if rules.slot_minutes == 0 {
        return Err(AppError::InvalidArgument(
            "slot duration must be greater than zero".to_string(),
        ));
    }
    let Some(hours) = hours else {
        return Ok(Vec::new());
    };
    if rules.hide_past_slots && date < now.date() {
        return Ok(Vec::new());
    }

    let taken: Vec<NaiveTime> = existing
        .iter()
        .filter(|b| rules.cancelled_blocks_slot || b.status != BookingStatus::Cancelled)
        .filter_map(|b| parse_time(&b.time).ok())
        .collect();

    let is_today = date == now.date();
    let slots = candidate_slots(hours, rules.slot_minutes)?
        .into_iter()
        .filter(|slot| !taken.contains(&slot.start))
        .filter(|slot| !(rules.hide_past_slots && is_today && slot.start < now.time()))
        .collect();

    Ok(slots)
}
