//! Data model for the content library (`data.json`).
//!
//! The library is supplied by external content producers (bulk import,
//! manual editing, scraping pipelines) and is read-only at runtime except
//! for wholesale replacement through the import page.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
  #[serde(default)]
  pub version: String,
  #[serde(default)]
  pub created: String,
}

impl Default for Meta {
  fn default() -> Self {
    Self {
      version: "2.0".to_string(),
      created: String::new(),
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Library {
  #[serde(default)]
  pub meta: Meta,
  #[serde(default)]
  pub books: BTreeMap<String, Book>,
  /// Seed cards handed to the SRS scheduler on import
  #[serde(default)]
  pub srs_cards: Vec<CardSeed>,
  #[serde(default)]
  pub tests: BTreeMap<String, LevelTest>,
}

impl Library {
  pub fn total_lessons(&self) -> usize {
    self.books.values().map(|b| b.lessons.len()).sum()
  }

  pub fn lesson(&self, book_key: &str, lesson_id: i64) -> Option<&Lesson> {
    self
      .books
      .get(book_key)?
      .lessons
      .iter()
      .find(|l| l.id == lesson_id)
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Book {
  pub title: String,
  #[serde(default)]
  pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
  pub id: i64,
  pub title: String,
  #[serde(default)]
  pub level: Option<String>,
  #[serde(default)]
  pub summary: String,
  #[serde(default)]
  pub objectives: Vec<String>,
  #[serde(default)]
  pub explanations: Option<String>,
  #[serde(default)]
  pub vocabulary: Vec<VocabEntry>,
  #[serde(default)]
  pub exercises: Vec<Exercise>,
  /// Speaking prompts, presented without auto-grading
  #[serde(default)]
  pub speaking: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabEntry {
  pub word: String,
  pub translation: String,
  #[serde(default)]
  pub example: Option<String>,
}

/// A `{front, back}` pair from an external content producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSeed {
  pub front: String,
  pub back: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Exercise {
  MultipleChoice {
    question: String,
    options: Vec<String>,
    /// Index into `options`
    answer: usize,
    #[serde(default)]
    feedback: String,
  },
  GapFill {
    question: String,
    answer: String,
    #[serde(default)]
    alternatives: Vec<String>,
    #[serde(default)]
    feedback: String,
  },
  Transformation {
    question: String,
    answer: String,
    #[serde(default)]
    alternatives: Vec<String>,
    #[serde(default)]
    feedback: String,
  },
  Correction {
    question: String,
    answer: String,
    #[serde(default)]
    alternatives: Vec<String>,
    #[serde(default)]
    feedback: String,
  },
  Production {
    question: String,
    #[serde(default)]
    feedback: String,
  },
}

impl Exercise {
  pub fn question(&self) -> &str {
    match self {
      Self::MultipleChoice { question, .. }
      | Self::GapFill { question, .. }
      | Self::Transformation { question, .. }
      | Self::Correction { question, .. }
      | Self::Production { question, .. } => question,
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Self::MultipleChoice { .. } => "multiple_choice",
      Self::GapFill { .. } => "gap_fill",
      Self::Transformation { .. } => "transformation",
      Self::Correction { .. } => "correction",
      Self::Production { .. } => "production",
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelTest {
  pub title: String,
  #[serde(default)]
  pub duration: Option<String>,
  #[serde(default)]
  pub questions: Vec<TestQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestQuestion {
  pub question: String,
  pub answer: String,
  #[serde(default)]
  pub alternatives: Vec<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_minimal_library() {
    let json = r#"{"meta": {"version": "2.0"}}"#;
    let lib: Library = serde_json::from_str(json).unwrap();
    assert_eq!(lib.meta.version, "2.0");
    assert!(lib.books.is_empty());
    assert!(lib.srs_cards.is_empty());
    assert_eq!(lib.total_lessons(), 0);
  }

  #[test]
  fn test_parse_exercise_variants() {
    let json = r#"[
      {"type": "multiple_choice", "question": "Pick one", "options": ["a", "b"], "answer": 1},
      {"type": "gap_fill", "question": "I ___ happy", "answer": "am", "alternatives": ["'m"]},
      {"type": "transformation", "question": "Make it negative", "answer": "I am not tired"},
      {"type": "correction", "question": "I is tall", "answer": "I am tall"},
      {"type": "production", "question": "Introduce yourself"}
    ]"#;
    let exercises: Vec<Exercise> = serde_json::from_str(json).unwrap();
    assert_eq!(exercises.len(), 5);
    assert_eq!(exercises[0].kind(), "multiple_choice");
    assert_eq!(exercises[1].kind(), "gap_fill");
    assert_eq!(exercises[4].question(), "Introduce yourself");
  }

  #[test]
  fn test_parse_full_lesson() {
    let json = r#"{
      "id": 3,
      "title": "Greetings",
      "level": "A1",
      "summary": "Say hello",
      "objectives": ["Greet people"],
      "vocabulary": [{"word": "hello", "translation": "bonjour", "example": "Hello, Tom!"}],
      "exercises": [{"type": "production", "question": "Greet a colleague"}],
      "speaking": ["Read the dialogue out loud"]
    }"#;
    let lesson: Lesson = serde_json::from_str(json).unwrap();
    assert_eq!(lesson.id, 3);
    assert_eq!(lesson.level.as_deref(), Some("A1"));
    assert_eq!(lesson.vocabulary.len(), 1);
    assert_eq!(lesson.speaking.len(), 1);
  }

  #[test]
  fn test_lesson_lookup() {
    let json = r#"{
      "books": {
        "forty_lessons": {
          "title": "40 Lessons",
          "lessons": [{"id": 1, "title": "To be"}, {"id": 2, "title": "Articles"}]
        }
      }
    }"#;
    let lib: Library = serde_json::from_str(json).unwrap();
    assert_eq!(lib.total_lessons(), 2);
    assert_eq!(lib.lesson("forty_lessons", 2).unwrap().title, "Articles");
    assert!(lib.lesson("forty_lessons", 9).is_none());
    assert!(lib.lesson("missing", 1).is_none());
  }
}
