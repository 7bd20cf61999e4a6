use std::env;

use crate::services::availability::SlotRules;

/// A slot can never be longer than a day.
pub const MAX_SLOT_MINUTES: u32 = 24 * 60;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_username: String,
    pub admin_password: String,
    pub admin_token: String,
    pub default_slot_minutes: u32,
    pub cancelled_blocks_slot: bool,
    pub hide_past_slots: bool,
    pub cors_origins: Vec<String>,
    pub default_whatsapp_number: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "studio.db".to_string()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            default_slot_minutes: env::var("DEFAULT_SLOT_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|m| (1..=MAX_SLOT_MINUTES).contains(m))
                .unwrap_or(90),
            cancelled_blocks_slot: env_flag("CANCELLED_BLOCKS_SLOT", false),
            hide_past_slots: env_flag("HIDE_PAST_SLOTS", false),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            default_whatsapp_number: env::var("DEFAULT_WHATSAPP_NUMBER")
                .unwrap_or_else(|_| "+5588998376642".to_string()),
        }
    }

    /// Slot rules for a day whose stored interval is `interval_minutes`.
    /// Non-positive intervals fall back to `default_slot_minutes`.
    pub fn slot_rules(&self, interval_minutes: Option<i32>) -> SlotRules {
        let slot_minutes = interval_minutes
            .filter(|m| *m > 0)
            .map(|m| (m as u32).min(MAX_SLOT_MINUTES))
            .unwrap_or(self.default_slot_minutes);
        SlotRules {
            slot_minutes,
            cancelled_blocks_slot: self.cancelled_blocks_slot,
            hide_past_slots: self.hide_past_slots,
        }
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
