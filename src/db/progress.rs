//! Lesson completion tracking per (username, book, lesson).

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};
use std::collections::HashSet;

/// One completion row, as exported to CSV
#[derive(Debug, Clone)]
pub struct ProgressRow {
    pub book_key: String,
    pub lesson_id: i64,
    pub completed_at: String,
    pub score: i64,
}

/// Upsert a completion row; re-completing a lesson overwrites the old score
pub fn mark_lesson_complete(
    conn: &Connection,
    username: &str,
    book_key: &str,
    lesson_id: i64,
    score: i64,
    now: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        r#"
    INSERT OR REPLACE INTO lesson_progress
      (username, book_key, lesson_id, completed_at, score)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
        params![username, book_key, lesson_id, now.to_rfc3339(), score],
    )?;
    Ok(())
}

pub fn is_lesson_completed(
    conn: &Connection,
    username: &str,
    book_key: &str,
    lesson_id: i64,
) -> Result<bool> {
    let mut stmt = conn.prepare(
        "SELECT 1 FROM lesson_progress WHERE username = ?1 AND book_key = ?2 AND lesson_id = ?3",
    )?;
    stmt.exists(params![username, book_key, lesson_id])
}

/// Lesson ids already completed within one book
pub fn completed_lessons_in_book(
    conn: &Connection,
    username: &str,
    book_key: &str,
) -> Result<HashSet<i64>> {
    let mut stmt = conn.prepare(
        "SELECT lesson_id FROM lesson_progress WHERE username = ?1 AND book_key = ?2",
    )?;

    let ids = stmt
        .query_map(params![username, book_key], |row| row.get(0))?
        .collect::<Result<HashSet<_>>>()?;
    Ok(ids)
}

pub fn completed_lesson_count(conn: &Connection, username: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM lesson_progress WHERE username = ?1",
        params![username],
        |row| row.get(0),
    )
}

/// All completion rows for an owner, newest first (export projection)
pub fn get_progress_rows(conn: &Connection, username: &str) -> Result<Vec<ProgressRow>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT book_key, lesson_id, completed_at, score
    FROM lesson_progress
    WHERE username = ?1
    ORDER BY completed_at DESC
    "#,
    )?;

    let rows = stmt
        .query_map(params![username], |row| {
            Ok(ProgressRow {
                book_key: row.get(0)?,
                lesson_id: row.get(1)?,
                completed_at: row.get(2)?,
                score: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(rows)
}
