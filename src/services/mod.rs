pub mod availability;
pub mod scheduling;
