//! Book and lesson pages with exercise checking.

use askama::Template;
use axum::extract::{Form, Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use std::collections::HashMap;

use crate::config;
use crate::content::exercises::{self, ExerciseOutcome};
use crate::db::{self, LogOnError};
use crate::domain::{Exercise, Lesson};
use crate::state::AppState;

use super::{current_user, error_page};

pub struct LessonRow {
  pub id: i64,
  pub title: String,
  pub level: String,
  pub completed: bool,
}

#[derive(Template)]
#[template(path = "book.html")]
pub struct BookTemplate {
  pub book_key: String,
  pub title: String,
  pub lessons: Vec<LessonRow>,
}

pub struct VocabView {
  pub word: String,
  pub translation: String,
  pub example: String,
}

pub struct ExerciseView {
  pub number: usize,
  /// Form field name for this exercise's answer
  pub name: String,
  pub kind: &'static str,
  pub question: String,
  pub options: Vec<String>,
}

pub struct ResultView {
  pub number: usize,
  pub status: &'static str,
  pub expected: String,
  pub feedback: String,
  pub hints: Vec<String>,
}

#[derive(Template)]
#[template(path = "lesson.html")]
pub struct LessonTemplate {
  pub book_key: String,
  pub book_title: String,
  pub lesson_id: i64,
  pub title: String,
  pub level: String,
  pub summary: String,
  pub objectives: Vec<String>,
  pub explanations: String,
  pub vocabulary: Vec<VocabView>,
  pub exercises: Vec<ExerciseView>,
  pub speaking: Vec<String>,
  pub completed: bool,
  pub has_results: bool,
  pub results: Vec<ResultView>,
  pub correct_count: usize,
  pub graded_count: usize,
  pub score_percent: i64,
  pub passed: bool,
}

pub async fn book_page(
  State(state): State<AppState>,
  jar: CookieJar,
  Path(book_key): Path<String>,
) -> Response {
  let Some(username) = current_user(&jar) else {
    return Redirect::to("/").into_response();
  };

  let Some((title, lesson_meta)) = book_lessons(&state, &book_key) else {
    return Html("<h1>Book not found</h1>".to_string()).into_response();
  };

  let completed = match db::try_lock(&state.db) {
    Ok(conn) => db::completed_lessons_in_book(&conn, &username, &book_key)
      .log_warn_default("Failed to load completed lessons"),
    Err(_) => return error_page().into_response(),
  };

  let lessons = lesson_meta
    .into_iter()
    .map(|(id, title, level)| LessonRow {
      completed: completed.contains(&id),
      id,
      title,
      level,
    })
    .collect();

  let template = BookTemplate {
    book_key,
    title,
    lessons,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

pub async fn lesson_page(
  State(state): State<AppState>,
  jar: CookieJar,
  Path((book_key, lesson_id)): Path<(String, i64)>,
) -> Response {
  let Some(username) = current_user(&jar) else {
    return Redirect::to("/").into_response();
  };
  lesson_response(&state, &username, &book_key, lesson_id, None)
}

pub async fn submit_lesson(
  State(state): State<AppState>,
  jar: CookieJar,
  Path((book_key, lesson_id)): Path<(String, i64)>,
  Form(answers): Form<HashMap<String, String>>,
) -> Response {
  let Some(username) = current_user(&jar) else {
    return Redirect::to("/").into_response();
  };
  lesson_response(&state, &username, &book_key, lesson_id, Some(&answers))
}

/// (title, (id, title, level) per lesson) for one book
fn book_lessons(state: &AppState, book_key: &str) -> Option<(String, Vec<(i64, String, String)>)> {
  let library = state.library.read().ok()?;
  let book = library.books.get(book_key)?;
  let meta = book
    .lessons
    .iter()
    .map(|l| (l.id, l.title.clone(), l.level.clone().unwrap_or_default()))
    .collect();
  Some((book.title.clone(), meta))
}

fn lesson_response(
  state: &AppState,
  username: &str,
  book_key: &str,
  lesson_id: i64,
  answers: Option<&HashMap<String, String>>,
) -> Response {
  let Some((book_title, lesson)) = ({
    state.library.read().ok().and_then(|library| {
      let book = library.books.get(book_key)?;
      let lesson = library.lesson(book_key, lesson_id)?;
      Some((book.title.clone(), lesson.clone()))
    })
  }) else {
    return Html("<h1>Lesson not found</h1>".to_string()).into_response();
  };

  let conn = match db::try_lock(&state.db) {
    Ok(conn) => conn,
    Err(_) => return error_page().into_response(),
  };

  let mut results = Vec::new();
  let mut correct_count = 0;
  let mut graded_count = 0;
  let mut score_percent = 0;
  let mut passed = false;

  if let Some(answers) = answers {
    let outcomes: Vec<ExerciseOutcome> = lesson
      .exercises
      .iter()
      .enumerate()
      .map(|(idx, exercise)| {
        let given = answers
          .get(&format!("answer_{}", idx))
          .map(String::as_str)
          .unwrap_or("");
        exercises::check_exercise(exercise, given)
      })
      .collect();

    let (correct, graded) = exercises::tally(&outcomes);
    correct_count = correct;
    graded_count = graded;
    score_percent = exercises::percentage(correct, graded);
    passed = graded > 0 && score_percent >= config::LESSON_PASS_PERCENT;

    if passed {
      db::mark_lesson_complete(&conn, username, book_key, lesson_id, score_percent, Utc::now())
        .log_warn("Failed to mark lesson complete");
    }

    results = outcomes
      .into_iter()
      .enumerate()
      .map(|(idx, outcome)| match outcome {
        ExerciseOutcome::Correct { feedback } => ResultView {
          number: idx + 1,
          status: "correct",
          expected: String::new(),
          feedback,
          hints: Vec::new(),
        },
        ExerciseOutcome::Incorrect { expected, feedback } => ResultView {
          number: idx + 1,
          status: "incorrect",
          expected,
          feedback,
          hints: Vec::new(),
        },
        ExerciseOutcome::Free { hints } => ResultView {
          number: idx + 1,
          status: "free",
          expected: String::new(),
          feedback: String::new(),
          hints,
        },
      })
      .collect();
  }

  let completed = db::is_lesson_completed(&conn, username, book_key, lesson_id)
    .log_warn_default("Failed to check lesson completion");
  drop(conn);

  let template = LessonTemplate {
    book_key: book_key.to_string(),
    book_title,
    lesson_id,
    title: lesson.title.clone(),
    level: lesson.level.clone().unwrap_or_default(),
    summary: lesson.summary.clone(),
    objectives: lesson.objectives.clone(),
    explanations: lesson.explanations.clone().unwrap_or_default(),
    vocabulary: lesson
      .vocabulary
      .iter()
      .map(|v| VocabView {
        word: v.word.clone(),
        translation: v.translation.clone(),
        example: v.example.clone().unwrap_or_default(),
      })
      .collect(),
    exercises: exercise_views(&lesson),
    speaking: lesson.speaking.clone(),
    completed,
    has_results: !results.is_empty(),
    results,
    correct_count,
    graded_count,
    score_percent,
    passed,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

fn exercise_views(lesson: &Lesson) -> Vec<ExerciseView> {
  lesson
    .exercises
    .iter()
    .enumerate()
    .map(|(idx, exercise)| {
      let options = match exercise {
        Exercise::MultipleChoice { options, .. } => options.clone(),
        _ => Vec::new(),
      };
      ExerciseView {
        number: idx + 1,
        name: format!("answer_{}", idx),
        kind: exercise.kind(),
        question: exercise.question().to_string(),
        options,
      }
    })
    .collect()
}
