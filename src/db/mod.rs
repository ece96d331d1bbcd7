use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

pub mod meetings;

/// Open the application database at the default location.
pub fn init_db() -> Result<Connection> {
    let db_path = crate::global::db_file()?;
    open(&db_path)
}

/// Open (and migrate) a database at an explicit path.
pub fn open(db_path: &Path) -> Result<Connection> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    let conn = Connection::open(db_path).context("Failed to open database connection")?;

    migrate(&conn)?;

    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS meetings (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            meeting_date TEXT NOT NULL,
            duration_seconds INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL,
            audio_path TEXT,
            transcript TEXT,
            summary TEXT,
            decisions TEXT NOT NULL DEFAULT '[]',
            action_items TEXT NOT NULL DEFAULT '[]',
            follow_ups TEXT NOT NULL DEFAULT '[]',
            error TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create meetings table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_meetings_created_at ON meetings(created_at DESC)",
        [],
    )
    .context("Failed to create index on created_at")?;

    Ok(())
}
