//! Test utilities: database setup and a CardStore test double.

use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

use crate::domain::SrsCard;
use crate::srs::{CardStore, SrsError};

/// Test environment with a migrated progress.db in a temporary directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let db_path = temp.path().join("progress.db");
        let conn = Connection::open(&db_path)?;
        crate::db::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }

    /// Get the temporary directory path for creating test files.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }
}

/// In-memory `CardStore` preserving insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cards: Vec<SrsCard>,
}

impl CardStore for MemoryStore {
    fn upsert(&mut self, card: &SrsCard) -> Result<(), SrsError> {
        match self
            .cards
            .iter_mut()
            .find(|c| c.owner == card.owner && c.front == card.front)
        {
            Some(existing) => *existing = card.clone(),
            None => self.cards.push(card.clone()),
        }
        Ok(())
    }

    fn get(&self, owner: &str, front: &str) -> Result<Option<SrsCard>, SrsError> {
        Ok(
            self
                .cards
                .iter()
                .find(|c| c.owner == owner && c.front == front)
                .cloned(),
        )
    }

    fn update(&mut self, card: &SrsCard) -> Result<(), SrsError> {
        self.upsert(card)
    }

    fn due(&self, owner: &str, today: NaiveDate) -> Result<Vec<SrsCard>, SrsError> {
        Ok(
            self
                .cards
                .iter()
                .filter(|c| c.owner == owner && c.is_due(today))
                .cloned()
                .collect(),
        )
    }

    fn all(&self, owner: &str) -> Result<Vec<SrsCard>, SrsError> {
        Ok(
            self
                .cards
                .iter()
                .filter(|c| c.owner == owner)
                .cloned()
                .collect(),
        )
    }
}
