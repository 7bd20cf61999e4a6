use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub whatsapp_number: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingsUpdate {
    pub whatsapp_number: String,
}
