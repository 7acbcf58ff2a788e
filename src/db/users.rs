//! User rows: created on first use, no credentials attached.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

/// CEFR self-assessment levels, lowest to highest
pub const CEFR_LEVELS: [&str; 5] = ["A1", "A2", "B1", "B2", "C1"];

/// Create the user row if it does not exist yet
pub fn create_user(conn: &Connection, username: &str, now: DateTime<Utc>) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO users (username, created_at) VALUES (?1, ?2)",
        params![username, now.to_rfc3339()],
    )?;
    Ok(())
}

pub fn get_current_level(conn: &Connection, username: &str) -> Result<String> {
    let level: Option<String> = conn
        .query_row(
            "SELECT current_level FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )
        .optional()?;
    Ok(level.unwrap_or_else(|| "A1".to_string()))
}

pub fn set_current_level(conn: &Connection, username: &str, level: &str) -> Result<()> {
    // Unknown levels are ignored rather than stored
    if !CEFR_LEVELS.contains(&level) {
        return Ok(());
    }
    conn.execute(
        "UPDATE users SET current_level = ?1 WHERE username = ?2",
        params![level, username],
    )?;
    Ok(())
}
