use serde::{Deserialize, Serialize};

/// A customer appointment. `date` is `YYYY-MM-DD` and `time` is `HH:MM`,
/// stored as text exactly as submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    pub customer_name: String,
    pub phone: String,
    pub service_id: String,
    pub service_name: String,
    pub date: String,
    pub time: String,
    pub status: BookingStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub customer_name: String,
    pub phone: String,
    pub service_id: String,
    pub date: String,
    pub time: String,
}
