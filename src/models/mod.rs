pub mod availability;
pub mod booking;
pub mod business_hours;
pub mod service;
pub mod settings;

pub use availability::TimeSlot;
pub use booking::{Booking, BookingStatus, NewBooking};
pub use business_hours::{BusinessHours, BusinessHoursUpdate};
pub use service::{NewService, Service, ServiceUpdate};
pub use settings::{Settings, SettingsUpdate};
