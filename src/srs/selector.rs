//! Due-card selection policy.
//!
//! The reference behavior presents a uniformly random due card; the
//! deterministic alternative surfaces the most overdue card first. The
//! policy is chosen at startup (config.toml / SRS_POLICY).

use rand::Rng;

use crate::domain::SrsCard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
  /// A uniformly random card among the due set
  #[default]
  UniformRandom,
  /// Never-scheduled cards first, then earliest next_review
  MostOverdueFirst,
}

impl SelectionPolicy {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "random" => Some(Self::UniformRandom),
      "overdue" => Some(Self::MostOverdueFirst),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::UniformRandom => "random",
      Self::MostOverdueFirst => "overdue",
    }
  }
}

pub fn pick_card(cards: &[SrsCard], policy: SelectionPolicy) -> Option<&SrsCard> {
  if cards.is_empty() {
    return None;
  }

  match policy {
    SelectionPolicy::UniformRandom => {
      let idx = rand::rng().random_range(0..cards.len());
      cards.get(idx)
    }
    // None sorts before Some, so never-scheduled cards win
    SelectionPolicy::MostOverdueFirst => cards.iter().min_by_key(|c| c.next_review),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{NaiveDate, TimeZone, Utc};

  fn card(front: &str, next_review: Option<NaiveDate>) -> SrsCard {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    let mut card = SrsCard::new("alice".into(), front.into(), "back".into(), now);
    card.next_review = next_review;
    card
  }

  fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
  }

  #[test]
  fn test_empty_due_set() {
    assert!(pick_card(&[], SelectionPolicy::UniformRandom).is_none());
    assert!(pick_card(&[], SelectionPolicy::MostOverdueFirst).is_none());
  }

  #[test]
  fn test_most_overdue_prefers_unscheduled() {
    let cards = vec![
      card("a", date(2024, 3, 1)),
      card("b", None),
      card("c", date(2024, 2, 1)),
    ];
    let picked = pick_card(&cards, SelectionPolicy::MostOverdueFirst).unwrap();
    assert_eq!(picked.front, "b");
  }

  #[test]
  fn test_most_overdue_prefers_earliest_date() {
    let cards = vec![
      card("a", date(2024, 3, 1)),
      card("b", date(2024, 2, 1)),
      card("c", date(2024, 3, 9)),
    ];
    let picked = pick_card(&cards, SelectionPolicy::MostOverdueFirst).unwrap();
    assert_eq!(picked.front, "b");
  }

  #[test]
  fn test_uniform_random_picks_from_the_set() {
    let cards = vec![
      card("a", date(2024, 3, 1)),
      card("b", date(2024, 3, 2)),
      card("c", date(2024, 3, 3)),
    ];
    for _ in 0..50 {
      let picked = pick_card(&cards, SelectionPolicy::UniformRandom).unwrap();
      assert!(cards.iter().any(|c| c.front == picked.front));
    }
  }

  #[test]
  fn test_policy_round_trip() {
    for policy in [SelectionPolicy::UniformRandom, SelectionPolicy::MostOverdueFirst] {
      assert_eq!(SelectionPolicy::from_str(policy.as_str()), Some(policy));
    }
    assert_eq!(SelectionPolicy::from_str("fifo"), None);
  }
}
