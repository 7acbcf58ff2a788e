//! Scheduler over an injected card store.
//!
//! Each handler builds a short-lived `Scheduler` around a store scoped to
//! the current connection lock, so a register or review is one atomic
//! read-modify-write against the persisted row.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::domain::{ReviewQuality, SrsCard};

use super::selector::{self, SelectionPolicy};
use super::sm2;

#[derive(Debug, Error)]
pub enum SrsError {
  #[error("no card for owner {owner:?} with front {front:?}")]
  CardNotFound { owner: String, front: String },
  #[error("review quality {0} is out of range (expected 0-5)")]
  InvalidQuality(u8),
  #[error("storage error: {0}")]
  Storage(#[from] rusqlite::Error),
}

/// Storage contract for SRS cards, keyed by (owner, front).
pub trait CardStore {
  /// Insert or replace a card wholesale (registration resets the schedule)
  fn upsert(&mut self, card: &SrsCard) -> Result<(), SrsError>;
  fn get(&self, owner: &str, front: &str) -> Result<Option<SrsCard>, SrsError>;
  /// Write back an existing card's schedule state
  fn update(&mut self, card: &SrsCard) -> Result<(), SrsError>;
  /// Cards with no next_review or next_review <= today, in insertion order
  fn due(&self, owner: &str, today: NaiveDate) -> Result<Vec<SrsCard>, SrsError>;
  fn all(&self, owner: &str) -> Result<Vec<SrsCard>, SrsError>;
}

pub struct Scheduler<S: CardStore> {
  store: S,
  policy: SelectionPolicy,
}

impl<S: CardStore> Scheduler<S> {
  pub fn new(store: S, policy: SelectionPolicy) -> Self {
    Self { store, policy }
  }

  /// Upsert a card with a fresh schedule: interval 1, easiness 2.5, first
  /// review tomorrow. Registering over an existing (owner, front) discards
  /// its prior schedule progress.
  pub fn register_card(
    &mut self,
    owner: &str,
    front: &str,
    back: &str,
    now: DateTime<Utc>,
  ) -> Result<SrsCard, SrsError> {
    let card = SrsCard::new(owner.to_string(), front.to_string(), back.to_string(), now);
    self.store.upsert(&card)?;
    Ok(card)
  }

  pub fn due_cards(&self, owner: &str, today: NaiveDate) -> Result<Vec<SrsCard>, SrsError> {
    self.store.due(owner, today)
  }

  /// Pick the due card to present, according to the configured policy.
  pub fn pick_due(&self, owner: &str, today: NaiveDate) -> Result<Option<SrsCard>, SrsError> {
    let cards = self.store.due(owner, today)?;
    Ok(selector::pick_card(&cards, self.policy).cloned())
  }

  /// Apply a review outcome and persist the new schedule state.
  ///
  /// Fails with `InvalidQuality` before touching any state, and with
  /// `CardNotFound` when the (owner, front) pair does not exist.
  pub fn review(
    &mut self,
    owner: &str,
    front: &str,
    quality: u8,
    now: DateTime<Utc>,
  ) -> Result<SrsCard, SrsError> {
    if ReviewQuality::from_u8(quality).is_none() {
      return Err(SrsError::InvalidQuality(quality));
    }

    let Some(mut card) = self.store.get(owner, front)? else {
      return Err(SrsError::CardNotFound {
        owner: owner.to_string(),
        front: front.to_string(),
      });
    };

    let result = sm2::calculate_review(quality, card.easiness, card.interval, card.repetitions);

    card.easiness = result.easiness;
    card.interval = result.interval;
    card.repetitions = result.repetitions;
    card.next_review = Some(result.next_review(now.date_naive()));
    card.last_review = Some(now);

    self.store.update(&card)?;
    Ok(card)
  }

  /// Read-only projection of every card for an owner (export boundary).
  pub fn all_cards(&self, owner: &str) -> Result<Vec<SrsCard>, SrsError> {
    self.store.all(owner)
  }
}
