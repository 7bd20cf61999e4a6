use anyhow::Context;
use chrono::Utc;
use rusqlite::{params, Connection};

pub const DEFAULT_WHATSAPP_NUMBER: &str = "+5588998376642";
pub const DEFAULT_INTERVAL_MINUTES: i32 = 90;

// (day_of_week, open, close, is_open), Monday first.
const DEFAULT_HOURS: [(u8, &str, &str, bool); 7] = [
    (0, "08:00", "18:00", true),
    (1, "08:00", "18:00", true),
    (2, "08:00", "18:00", true),
    (3, "08:00", "18:00", true),
    (4, "08:00", "18:00", true),
    (5, "08:00", "12:00", true),
    (6, "08:00", "18:00", false),
];

const DEFAULT_SERVICES: [(&str, &str, f64); 5] = [
    ("Volume Brasileiro", "Brazilian lash extension technique", 150.0),
    ("Volume 5D", "5D extensions for intense volume", 180.0),
    ("Cat Eye", "Elegant cat eye effect", 160.0),
    ("Fox Eye", "Modern fox eye effect", 170.0),
    ("Capping", "Finishing technique for a clean line", 140.0),
];

/// Fills empty tables with the studio's starting configuration.
pub fn seed_defaults(conn: &Connection) -> anyhow::Result<()> {
    let hours_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM business_hours", [], |row| row.get(0))
        .context("failed to count business hours")?;
    if hours_count == 0 {
        for (day, open, close, is_open) in DEFAULT_HOURS {
            conn.execute(
                "INSERT INTO business_hours (day_of_week, open_time, close_time, is_open, interval_minutes)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![day, open, close, is_open, DEFAULT_INTERVAL_MINUTES],
            )
            .context("failed to seed business hours")?;
        }
        tracing::info!("default business hours created");
    }

    let services_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM services", [], |row| row.get(0))
        .context("failed to count services")?;
    if services_count == 0 {
        let now = Utc::now().to_rfc3339();
        for (name, description, price) in DEFAULT_SERVICES {
            conn.execute(
                "INSERT INTO services (id, name, description, price, image_url, active, created_at)
                 VALUES (?1, ?2, ?3, ?4, NULL, 1, ?5)",
                params![uuid::Uuid::new_v4().to_string(), name, description, price, now],
            )
            .context("failed to seed services")?;
        }
        tracing::info!("default services created");
    }

    conn.execute(
        "INSERT OR IGNORE INTO settings (id, whatsapp_number, updated_at) VALUES (1, ?1, ?2)",
        params![DEFAULT_WHATSAPP_NUMBER, Utc::now().to_rfc3339()],
    )
    .context("failed to seed settings")?;

    Ok(())
}
