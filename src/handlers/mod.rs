pub mod books;
pub mod srs;
pub mod transfer;
pub mod user;

use askama::Template;
use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse};
use axum::{routing::get, routing::post, Router};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::grammar;
use crate::db::{self, LogOnError};
use crate::state::AppState;

pub use books::{book_page, lesson_page, submit_lesson};
pub use srs::{add_card, import_cards, srs_page, submit_review};
pub use tests::{submit_test, tests_page};
pub use transfer::{export_cards_csv, export_page, export_progress_csv, import_page, import_submit};
pub use user::{set_level, set_user};

pub const USERNAME_COOKIE: &str = "username";

/// CEFR levels with the self-assessment wording shown in the picker
pub const LEVEL_DESCRIPTIONS: [(&str, &str); 5] = [
  ("A1", "Beginner - I understand simple sentences"),
  ("A2", "Elementary - I can talk about familiar topics"),
  ("B1", "Intermediate - I can describe experiences"),
  ("B2", "Upper intermediate - I can build an argument"),
  ("C1", "Advanced - I express myself fluently"),
];

/// Full application router; `main` and the integration tests share it.
pub fn build_router(state: AppState) -> Router {
  Router::new()
    .route("/", get(index))
    .route("/user", post(set_user))
    .route("/user/level", post(set_level))
    .route("/coach", post(coach))
    .route("/books/{key}", get(book_page))
    .route("/books/{key}/lessons/{id}", get(lesson_page).post(submit_lesson))
    .route("/srs", get(srs_page))
    .route("/srs/review", post(submit_review))
    .route("/srs/add", post(add_card))
    .route("/srs/import", post(import_cards))
    .route("/tests", get(tests_page).post(submit_test))
    .route("/export", get(export_page))
    .route("/export/cards.csv", get(export_cards_csv))
    .route("/export/progress.csv", get(export_progress_csv))
    .route("/import", get(import_page).post(import_submit))
    .nest_service("/static", ServeDir::new("static"))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

pub(crate) fn current_user(jar: &CookieJar) -> Option<String> {
  jar
    .get(USERNAME_COOKIE)
    .map(|c| c.value().trim().to_string())
    .filter(|v| !v.is_empty())
}

pub(crate) fn error_page() -> Html<String> {
  Html("<h1>Database Error</h1><p>Please refresh the page.</p>".to_string())
}

#[derive(Template)]
#[template(path = "welcome.html")]
pub struct WelcomeTemplate {}

pub struct LevelOption {
  pub code: String,
  pub label: String,
  pub selected: bool,
}

pub struct BookLink {
  pub key: String,
  pub title: String,
  pub lesson_count: usize,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
  pub username: String,
  pub completed_lessons: i64,
  pub total_lessons: usize,
  pub progress_percent: i64,
  pub due_count: i64,
  pub levels: Vec<LevelOption>,
  pub books: Vec<BookLink>,
  pub coach_text: String,
  pub hints: Vec<String>,
  pub analyzed: bool,
}

pub async fn index(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
  let Some(username) = current_user(&jar) else {
    return Html(WelcomeTemplate {}.render().unwrap_or_default());
  };
  dashboard_page(&state, &username, String::new(), Vec::new(), false)
}

#[derive(Deserialize)]
pub struct CoachForm {
  pub text: String,
}

/// POST /coach - grammar hints for a free sentence, shown on the dashboard
pub async fn coach(
  State(state): State<AppState>,
  jar: CookieJar,
  Form(form): Form<CoachForm>,
) -> impl IntoResponse {
  let Some(username) = current_user(&jar) else {
    return Html(WelcomeTemplate {}.render().unwrap_or_default());
  };

  let hints = if form.text.trim().is_empty() {
    Vec::new()
  } else {
    grammar::analyze(&form.text)
  };
  let analyzed = !form.text.trim().is_empty();

  dashboard_page(&state, &username, form.text, hints, analyzed)
}

fn dashboard_page(
  state: &AppState,
  username: &str,
  coach_text: String,
  hints: Vec<String>,
  analyzed: bool,
) -> Html<String> {
  let conn = match db::try_lock(&state.db) {
    Ok(conn) => conn,
    Err(_) => return error_page(),
  };

  let completed_lessons =
    db::completed_lesson_count(&conn, username).log_warn_default("Failed to count completed lessons");
  let due_count = db::get_due_count(&conn, username, Utc::now().date_naive())
    .log_warn_default("Failed to count due cards");
  let current_level = db::get_current_level(&conn, username)
    .log_warn("Failed to load user level")
    .unwrap_or_else(|| "A1".to_string());
  drop(conn);

  let (total_lessons, books) = match state.library.read() {
    Ok(library) => (
      library.total_lessons(),
      library
        .books
        .iter()
        .map(|(key, book)| BookLink {
          key: key.clone(),
          title: book.title.clone(),
          lesson_count: book.lessons.len(),
        })
        .collect(),
    ),
    Err(_) => (0, Vec::new()),
  };

  let progress_percent = if total_lessons > 0 {
    completed_lessons * 100 / total_lessons as i64
  } else {
    0
  };

  let levels = LEVEL_DESCRIPTIONS
    .iter()
    .map(|(code, description)| LevelOption {
      code: code.to_string(),
      label: format!("{} - {}", code, description),
      selected: *code == current_level,
    })
    .collect();

  let template = DashboardTemplate {
    username: username.to_string(),
    completed_lessons,
    total_lessons,
    progress_percent,
    due_count,
    levels,
    books,
    coach_text,
    hints,
    analyzed,
  };
  Html(template.render().unwrap_or_default())
}
