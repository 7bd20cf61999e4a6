pub mod migrations;
pub mod queries;
pub mod seed;

use anyhow::Context;
use rusqlite::{Connection, ErrorCode};

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;
    seed::seed_defaults(&conn)?;

    Ok(conn)
}

/// True when `err` wraps a SQLite constraint violation, such as a second
/// live booking on an occupied slot.
pub fn is_constraint_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<rusqlite::Error>(),
            Some(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation
        )
    })
}
