pub mod auth;
pub mod bookings;
pub mod business_hours;
pub mod health;
pub mod services;
pub mod settings;
pub mod upload;
