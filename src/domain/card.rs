use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A spaced-repetition flashcard, identified by (owner, front).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrsCard {
  pub owner: String,
  pub front: String,
  pub back: String,
  /// Days until the next review. Stored as a real number; grows
  /// geometrically with easiness once the card matures.
  pub interval: f64,
  /// Per-card difficulty factor, floored at 1.3. Higher = easier.
  pub easiness: f64,
  /// Consecutive successful reviews since the last lapse
  pub repetitions: i64,
  /// Day on or after which the card becomes due. None = due immediately.
  pub next_review: Option<NaiveDate>,
  pub last_review: Option<DateTime<Utc>>,
}

impl SrsCard {
  /// Fresh card with a reset schedule: first review tomorrow.
  pub fn new(owner: String, front: String, back: String, now: DateTime<Utc>) -> Self {
    Self {
      owner,
      front,
      back,
      interval: 1.0,
      easiness: 2.5,
      repetitions: 0,
      next_review: Some(now.date_naive() + Duration::days(1)),
      last_review: Some(now),
    }
  }

  pub fn is_due(&self, today: NaiveDate) -> bool {
    match self.next_review {
      None => true,
      Some(day) => day <= today,
    }
  }
}
