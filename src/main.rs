use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use studio_booking::config::AppConfig;
use studio_booking::db;
use studio_booking::router::build_router;
use studio_booking::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    if config.admin_token == "changeme" || config.admin_password == "admin123" {
        tracing::warn!("using default admin credentials; set ADMIN_PASSWORD and ADMIN_TOKEN");
    }

    let conn = db::init_db(&config.database_url)?;
    tracing::info!(
        database = %config.database_url,
        default_slot_minutes = config.default_slot_minutes,
        cancelled_blocks_slot = config.cancelled_blocks_slot,
        hide_past_slots = config.hide_past_slots,
        "database ready"
    );

    let state = Arc::new(AppState::new(conn, config.clone()));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
