use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Create tables with COMPLETE schema for new databases
  // Migrations below handle upgrades for existing databases
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS users (
      username TEXT PRIMARY KEY,
      created_at TEXT NOT NULL,
      current_level TEXT NOT NULL DEFAULT 'A1'
    );

    CREATE TABLE IF NOT EXISTS lesson_progress (
      username TEXT NOT NULL,
      book_key TEXT NOT NULL,
      lesson_id INTEGER NOT NULL,
      completed_at TEXT NOT NULL,
      score INTEGER NOT NULL DEFAULT 0,
      PRIMARY KEY (username, book_key, lesson_id)
    );

    CREATE TABLE IF NOT EXISTS srs_cards (
      username TEXT NOT NULL,
      front TEXT NOT NULL,
      back TEXT NOT NULL,
      interval REAL NOT NULL DEFAULT 1,
      easiness REAL NOT NULL DEFAULT 2.5,
      repetitions INTEGER NOT NULL DEFAULT 0,
      next_review TEXT,
      last_review TEXT,
      PRIMARY KEY (username, front)
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_srs_cards_due ON srs_cards(username, next_review);
    CREATE INDEX IF NOT EXISTS idx_lesson_progress_user ON lesson_progress(username);
    "#,
  )?;

  // ============================================================
  // MIGRATIONS FOR EXISTING DATABASES
  // These are no-ops for new databases (columns already exist)
  // ============================================================

  // Migration: Add CEFR self-assessment level
  add_column_if_missing(conn, "users", "current_level", "TEXT NOT NULL DEFAULT 'A1'")?;

  // Migration: Add exercise score to completion rows
  add_column_if_missing(conn, "lesson_progress", "score", "INTEGER NOT NULL DEFAULT 0")?;

  Ok(())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}
