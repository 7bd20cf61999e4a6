use chrono::{NaiveDate, NaiveTime};

use crate::errors::AppError;

/// A bookable window on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn label(&self) -> String {
        self.start.format("%H:%M").to_string()
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidArgument(format!("invalid date (expected YYYY-MM-DD): {s}")))
}

pub fn parse_time(s: &str) -> Result<NaiveTime, AppError> {
    let s = s.trim();
    let parts: Vec<&str> = s.split(':').collect();
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if parts.len() != 2
        || parts[0].len() > 2
        || parts[1].len() != 2
        || !parts.iter().all(|p| all_digits(*p))
    {
        return Err(AppError::InvalidArgument(format!("invalid time format: {s}")));
    }
    let hour: u32 = parts[0]
        .parse()
        .map_err(|_| AppError::InvalidArgument(format!("invalid hour in: {s}")))?;
    let minute: u32 = parts[1]
        .parse()
        .map_err(|_| AppError::InvalidArgument(format!("invalid minute in: {s}")))?;
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| AppError::InvalidArgument(format!("time out of range: {s}")))
}
