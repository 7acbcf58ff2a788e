use chrono::{Duration, NaiveDate};

pub const MIN_EASINESS: f64 = 1.3;

pub struct Sm2Result {
  pub easiness: f64,
  pub interval: f64,
  pub repetitions: i64,
}

impl Sm2Result {
  /// Whole-day offset for the next review date. The interval is stored as
  /// a real number but the calendar moves in whole days.
  pub fn interval_days(&self) -> i64 {
    self.interval.ceil() as i64
  }

  pub fn next_review(&self, today: NaiveDate) -> NaiveDate {
    today + Duration::days(self.interval_days())
  }
}

/// One SM-2 transition from a review outcome.
///
/// The easiness update reads the OLD easiness; the interval growth for a
/// mature card reads the OLD interval and the NEW easiness.
pub fn calculate_review(quality: u8, easiness: f64, interval: f64, repetitions: i64) -> Sm2Result {
  let q = quality as f64;

  // EF' = EF + 0.1 - (5 - q) * (0.08 + (5 - q) * 0.02), floored at 1.3
  let new_easiness = (easiness + 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)).max(MIN_EASINESS);

  let (new_interval, new_repetitions) = if quality < 3 {
    // Lapse: streak and interval reset
    (1.0, 0)
  } else {
    let reps = repetitions + 1;
    let days = match reps {
      1 => 1.0,
      2 => 6.0,
      _ => (interval * new_easiness).ceil(),
    };
    (days, reps)
  };

  Sm2Result {
    easiness: new_easiness,
    interval: new_interval,
    repetitions: new_repetitions,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_first_review_perfect() {
    let result = calculate_review(5, 2.5, 1.0, 0);
    assert!((result.easiness - 2.6).abs() < 1e-9);
    assert_eq!(result.repetitions, 1);
    assert!((result.interval - 1.0).abs() < f64::EPSILON);
  }

  #[test]
  fn test_second_review_perfect() {
    let result = calculate_review(5, 2.6, 1.0, 1);
    assert!((result.easiness - 2.7).abs() < 1e-9);
    assert_eq!(result.repetitions, 2);
    assert!((result.interval - 6.0).abs() < f64::EPSILON);
  }

  #[test]
  fn test_third_review_uses_new_easiness() {
    // 2.7 + 0.1 - 2 * (0.08 + 2 * 0.02) = 2.56; ceil(6 * 2.56) = 16
    let result = calculate_review(3, 2.7, 6.0, 2);
    assert!((result.easiness - 2.56).abs() < 1e-9);
    assert_eq!(result.repetitions, 3);
    assert!((result.interval - 16.0).abs() < f64::EPSILON);
  }

  #[test]
  fn test_lapse_resets_regardless_of_prior_state() {
    for quality in 0u8..3 {
      let result = calculate_review(quality, 2.5, 120.0, 9);
      assert_eq!(result.repetitions, 0, "quality {}", quality);
      assert!((result.interval - 1.0).abs() < f64::EPSILON, "quality {}", quality);
    }
  }

  #[test]
  fn test_lapse_still_lowers_easiness() {
    let result = calculate_review(0, 2.5, 15.0, 5);
    assert!(result.easiness < 2.5);
  }

  #[test]
  fn test_easiness_floor() {
    let mut ef = 2.5;
    let mut interval = 10.0;
    let mut reps = 5;

    for _ in 0..10 {
      let result = calculate_review(0, ef, interval, reps);
      ef = result.easiness;
      interval = result.interval;
      reps = result.repetitions;
      assert!(ef >= MIN_EASINESS);
      assert!(interval >= 1.0);
    }

    assert!((ef - MIN_EASINESS).abs() < 1e-9);
  }

  #[test]
  fn test_easiness_monotone_in_quality() {
    for &prior in &[1.3, 2.0, 2.5, 3.0] {
      let mut last = f64::NEG_INFINITY;
      for quality in 0u8..=5 {
        let result = calculate_review(quality, prior, 6.0, 2);
        assert!(
          result.easiness >= last,
          "easiness not monotone at quality {} from EF {}",
          quality,
          prior
        );
        last = result.easiness;
      }
    }
  }

  #[test]
  fn test_learning_ramp() {
    // Fresh card: interval 1, EF 2.5, reps 0. Three perfect reviews.
    let first = calculate_review(5, 2.5, 1.0, 0);
    assert!((first.interval - 1.0).abs() < f64::EPSILON);

    let second = calculate_review(5, first.easiness, first.interval, first.repetitions);
    assert!((second.interval - 6.0).abs() < f64::EPSILON);

    let third = calculate_review(5, second.easiness, second.interval, second.repetitions);
    assert!((third.interval - (6.0 * third.easiness).ceil()).abs() < f64::EPSILON);
    assert_eq!(third.repetitions, 3);
  }

  #[test]
  fn test_interval_grows_over_successive_reviews() {
    let mut ef = 2.5;
    let mut interval = 1.0;
    let mut reps = 0;

    for i in 0..5 {
      let result = calculate_review(4, ef, interval, reps);
      ef = result.easiness;
      interval = result.interval;
      reps = result.repetitions;

      match i {
        0 => assert!((interval - 1.0).abs() < f64::EPSILON),
        1 => assert!((interval - 6.0).abs() < f64::EPSILON),
        _ => assert!(interval > 6.0),
      }
    }

    assert!(interval > 30.0);
  }

  #[test]
  fn test_next_review_offset_uses_ceiling() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let result = Sm2Result {
      easiness: 2.5,
      interval: 15.36,
      repetitions: 3,
    };
    assert_eq!(result.interval_days(), 16);
    assert_eq!(result.next_review(today), NaiveDate::from_ymd_opt(2024, 3, 26).unwrap());
  }
}
