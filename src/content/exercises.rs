//! Exercise answer checking.
//!
//! Text answers are compared case-insensitively after trimming, against the
//! expected answer or any listed alternative. Free production is never
//! auto-graded; it goes through the grammar analyzer instead.

use crate::domain::Exercise;

use super::grammar;

#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseOutcome {
    Correct {
        feedback: String,
    },
    Incorrect {
        expected: String,
        feedback: String,
    },
    /// Free production: recorded, with grammar hints instead of a verdict
    Free {
        hints: Vec<String>,
    },
}

impl ExerciseOutcome {
    /// None for outcomes that do not count toward the score
    pub fn is_correct(&self) -> Option<bool> {
        match self {
            Self::Correct { .. } => Some(true),
            Self::Incorrect { .. } => Some(false),
            Self::Free { .. } => None,
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// True when `given` matches the expected answer or any alternative
pub fn answer_matches(expected: &str, alternatives: &[String], given: &str) -> bool {
    let given = normalize(given);
    given == normalize(expected) || alternatives.iter().any(|alt| normalize(alt) == given)
}

pub fn check_exercise(exercise: &Exercise, given: &str) -> ExerciseOutcome {
    match exercise {
        Exercise::MultipleChoice {
            options,
            answer,
            feedback,
            ..
        } => {
            let expected = options.get(*answer).cloned().unwrap_or_default();
            if given.trim() == expected {
                ExerciseOutcome::Correct {
                    feedback: feedback.clone(),
                }
            } else {
                ExerciseOutcome::Incorrect {
                    expected,
                    feedback: feedback.clone(),
                }
            }
        }

        Exercise::GapFill {
            answer,
            alternatives,
            feedback,
            ..
        }
        | Exercise::Transformation {
            answer,
            alternatives,
            feedback,
            ..
        }
        | Exercise::Correction {
            answer,
            alternatives,
            feedback,
            ..
        } => {
            if answer_matches(answer, alternatives, given) {
                ExerciseOutcome::Correct {
                    feedback: feedback.clone(),
                }
            } else {
                ExerciseOutcome::Incorrect {
                    expected: answer.clone(),
                    feedback: feedback.clone(),
                }
            }
        }

        Exercise::Production { .. } => ExerciseOutcome::Free {
            hints: grammar::analyze(given),
        },
    }
}

/// (correct, gradable) across a batch of outcomes
pub fn tally(outcomes: &[ExerciseOutcome]) -> (usize, usize) {
    let mut correct = 0;
    let mut gradable = 0;
    for outcome in outcomes {
        if let Some(ok) = outcome.is_correct() {
            gradable += 1;
            if ok {
                correct += 1;
            }
        }
    }
    (correct, gradable)
}

pub fn percentage(correct: usize, gradable: usize) -> i64 {
    if gradable == 0 {
        0
    } else {
        (correct * 100 / gradable) as i64
    }
}
