//! SRS card persistence over the shared connection.
//!
//! The table is keyed by (username, front); `INSERT OR REPLACE` gives
//! registration its upsert-and-reset semantics. Dates are ISO-8601 text,
//! so lexicographic comparison in SQL matches date order.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::SrsCard;
use crate::srs::{CardStore, SrsError};

pub fn upsert_card(conn: &Connection, card: &SrsCard) -> Result<()> {
    conn.execute(
        r#"
    INSERT OR REPLACE INTO srs_cards
      (username, front, back, interval, easiness, repetitions, next_review, last_review)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    "#,
        params![
            card.owner,
            card.front,
            card.back,
            card.interval,
            card.easiness,
            card.repetitions,
            card.next_review.map(|d| d.to_string()),
            card.last_review.map(|t| t.to_rfc3339()),
        ],
    )?;
    Ok(())
}

pub fn get_card(conn: &Connection, owner: &str, front: &str) -> Result<Option<SrsCard>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT username, front, back, interval, easiness, repetitions, next_review, last_review
    FROM srs_cards WHERE username = ?1 AND front = ?2
    "#,
    )?;

    let mut rows = stmt.query(params![owner, front])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_card(row)?))
    } else {
        Ok(None)
    }
}

pub fn update_card(conn: &Connection, card: &SrsCard) -> Result<()> {
    conn.execute(
        r#"
    UPDATE srs_cards
    SET back = ?1, interval = ?2, easiness = ?3, repetitions = ?4,
        next_review = ?5, last_review = ?6
    WHERE username = ?7 AND front = ?8
    "#,
        params![
            card.back,
            card.interval,
            card.easiness,
            card.repetitions,
            card.next_review.map(|d| d.to_string()),
            card.last_review.map(|t| t.to_rfc3339()),
            card.owner,
            card.front,
        ],
    )?;
    Ok(())
}

pub fn get_due_cards(conn: &Connection, owner: &str, today: NaiveDate) -> Result<Vec<SrsCard>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT username, front, back, interval, easiness, repetitions, next_review, last_review
    FROM srs_cards
    WHERE username = ?1 AND (next_review IS NULL OR next_review <= ?2)
    ORDER BY rowid ASC
    "#,
    )?;

    let cards = stmt
        .query_map(params![owner, today.to_string()], |row| row_to_card(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(cards)
}

pub fn get_due_count(conn: &Connection, owner: &str, today: NaiveDate) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM srs_cards WHERE username = ?1 AND (next_review IS NULL OR next_review <= ?2)",
        params![owner, today.to_string()],
        |row| row.get(0),
    )
}

pub fn get_all_cards(conn: &Connection, owner: &str) -> Result<Vec<SrsCard>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT username, front, back, interval, easiness, repetitions, next_review, last_review
    FROM srs_cards
    WHERE username = ?1
    ORDER BY rowid ASC
    "#,
    )?;

    let cards = stmt
        .query_map(params![owner], |row| row_to_card(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(cards)
}

/// Convert a database row to an SrsCard struct
fn row_to_card(row: &rusqlite::Row) -> Result<SrsCard> {
    let next_review_str: Option<String> = row.get(6)?;
    let last_review_str: Option<String> = row.get(7)?;

    Ok(SrsCard {
        owner: row.get(0)?,
        front: row.get(1)?,
        back: row.get(2)?,
        interval: row.get(3)?,
        easiness: row.get(4)?,
        repetitions: row.get(5)?,
        next_review: next_review_str.and_then(|s| s.parse::<NaiveDate>().ok()),
        last_review: last_review_str.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }),
    })
}

/// `CardStore` backed by the shared SQLite connection.
///
/// Borrow scoped to the caller's connection lock, so a scheduler operation
/// is one atomic read-modify-write cycle.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl CardStore for SqliteStore<'_> {
    fn upsert(&mut self, card: &SrsCard) -> std::result::Result<(), SrsError> {
        upsert_card(self.conn, card)?;
        Ok(())
    }

    fn get(&self, owner: &str, front: &str) -> std::result::Result<Option<SrsCard>, SrsError> {
        Ok(get_card(self.conn, owner, front)?)
    }

    fn update(&mut self, card: &SrsCard) -> std::result::Result<(), SrsError> {
        update_card(self.conn, card)?;
        Ok(())
    }

    fn due(&self, owner: &str, today: NaiveDate) -> std::result::Result<Vec<SrsCard>, SrsError> {
        Ok(get_due_cards(self.conn, owner, today)?)
    }

    fn all(&self, owner: &str) -> std::result::Result<Vec<SrsCard>, SrsError> {
        Ok(get_all_cards(self.conn, owner)?)
    }
}
