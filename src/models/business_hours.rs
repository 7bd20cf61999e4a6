use serde::{Deserialize, Serialize};

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Opening window for one weekday. `day_of_week` is Monday-first:
/// 0 = Monday .. 6 = Sunday.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusinessHours {
    pub day_of_week: u8,
    pub open_time: String,
    pub close_time: String,
    pub is_open: bool,
    pub interval_minutes: i32,
}

impl BusinessHours {
    pub fn day_name(&self) -> &'static str {
        DAY_NAMES
            .get(self.day_of_week as usize)
            .copied()
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusinessHoursUpdate {
    pub is_open: bool,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub interval_minutes: Option<i32>,
}
