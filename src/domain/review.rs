use serde::{Deserialize, Serialize};

/// Recall quality reported after a review, on the 0-5 SM-2 scale.
///
/// The UI maps its rating buttons onto a subset of these (0 / 3 / 5 in the
/// simplest variant); the scheduler accepts the full scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewQuality {
  Blackout = 0,
  Wrong = 1,
  AlmostRecalled = 2,
  Difficult = 3,
  Hesitant = 4,
  Perfect = 5,
}

impl ReviewQuality {
  pub fn from_u8(value: u8) -> Option<Self> {
    match value {
      0 => Some(Self::Blackout),
      1 => Some(Self::Wrong),
      2 => Some(Self::AlmostRecalled),
      3 => Some(Self::Difficult),
      4 => Some(Self::Hesitant),
      5 => Some(Self::Perfect),
      _ => None,
    }
  }

  pub fn as_u8(&self) -> u8 {
    *self as u8
  }

  /// Quality below 3 is a lapse: the repetition streak resets.
  pub fn is_lapse(&self) -> bool {
    self.as_u8() < 3
  }
}
