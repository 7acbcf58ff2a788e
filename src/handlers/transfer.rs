//! CSV export downloads and content library (JSON) import.

use askama::Template;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use chrono::Utc;

use crate::content;
use crate::db::{self, LogOnError};
use crate::domain::Library;
use crate::export;
use crate::state::AppState;

use super::{current_user, error_page};

#[derive(Template)]
#[template(path = "export.html")]
pub struct ExportTemplate {
  pub username: String,
  pub card_count: usize,
  pub progress_count: usize,
}

pub async fn export_page(State(state): State<AppState>, jar: CookieJar) -> Response {
  let Some(username) = current_user(&jar) else {
    return Redirect::to("/").into_response();
  };

  let conn = match db::try_lock(&state.db) {
    Ok(conn) => conn,
    Err(_) => return error_page().into_response(),
  };

  let card_count = db::get_all_cards(&conn, &username)
    .log_warn_default("Failed to load cards")
    .len();
  let progress_count = db::get_progress_rows(&conn, &username)
    .log_warn_default("Failed to load progress")
    .len();

  let template = ExportTemplate {
    username,
    card_count,
    progress_count,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

pub async fn export_cards_csv(State(state): State<AppState>, jar: CookieJar) -> Response {
  let Some(username) = current_user(&jar) else {
    return Redirect::to("/").into_response();
  };

  let cards = {
    let conn = match db::try_lock(&state.db) {
      Ok(conn) => conn,
      Err(_) => return error_page().into_response(),
    };
    match db::get_all_cards(&conn, &username) {
      Ok(cards) => cards,
      Err(e) => {
        tracing::warn!("Card export failed: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, "Export failed").into_response();
      }
    }
  };

  match export::cards_csv(&cards) {
    Ok(body) => csv_download(&format!("srs_cards_{}_{}", username, today_stamp()), body),
    Err(e) => {
      tracing::warn!("Card export failed: {}", e);
      (StatusCode::INTERNAL_SERVER_ERROR, "Export failed").into_response()
    }
  }
}

pub async fn export_progress_csv(State(state): State<AppState>, jar: CookieJar) -> Response {
  let Some(username) = current_user(&jar) else {
    return Redirect::to("/").into_response();
  };

  let rows = {
    let conn = match db::try_lock(&state.db) {
      Ok(conn) => conn,
      Err(_) => return error_page().into_response(),
    };
    match db::get_progress_rows(&conn, &username) {
      Ok(rows) => rows,
      Err(e) => {
        tracing::warn!("Progress export failed: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, "Export failed").into_response();
      }
    }
  };

  match export::progress_csv(&rows) {
    Ok(body) => csv_download(&format!("progress_{}_{}", username, today_stamp()), body),
    Err(e) => {
      tracing::warn!("Progress export failed: {}", e);
      (StatusCode::INTERNAL_SERVER_ERROR, "Export failed").into_response()
    }
  }
}

fn today_stamp() -> String {
  Utc::now().format("%Y%m%d").to_string()
}

fn csv_download(stem: &str, body: String) -> Response {
  (
    [
      (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}.csv\"", stem),
      ),
    ],
    body,
  )
    .into_response()
}

#[derive(Template)]
#[template(path = "import.html")]
pub struct ImportTemplate {
  pub message: String,
  pub has_message: bool,
  pub error: String,
  pub has_error: bool,
}

pub async fn import_page() -> impl IntoResponse {
  let template = ImportTemplate {
    message: String::new(),
    has_message: false,
    error: String::new(),
    has_error: false,
  };
  Html(template.render().unwrap_or_default())
}

/// POST /import - replace data.json with an uploaded file.
///
/// The upload is deserialized first; nothing on disk changes unless the
/// whole file parses.
pub async fn import_submit(State(state): State<AppState>, mut multipart: Multipart) -> Response {
  let mut uploaded = None;

  loop {
    match multipart.next_field().await {
      Ok(Some(field)) => {
        if field.name() == Some("file") {
          match field.bytes().await {
            Ok(bytes) => uploaded = Some(bytes),
            Err(e) => return import_result(None, Some(format!("Upload failed: {}", e))),
          }
        }
      }
      Ok(None) => break,
      Err(e) => return import_result(None, Some(format!("Upload failed: {}", e))),
    }
  }

  let Some(bytes) = uploaded else {
    return import_result(None, Some("Choose a JSON file first.".to_string()));
  };

  let library: Library = match serde_json::from_slice(&bytes) {
    Ok(library) => library,
    Err(e) => return import_result(None, Some(format!("Not a valid content file: {}", e))),
  };

  if let Err(e) = content::save_library(&state.data_file, &library) {
    tracing::warn!("Could not persist imported library: {}", e);
    return import_result(None, Some("Could not write the content file.".to_string()));
  }

  let summary = format!(
    "Imported {} book(s), {} lesson(s), {} seed card(s), {} test(s).",
    library.books.len(),
    library.total_lessons(),
    library.srs_cards.len(),
    library.tests.len()
  );

  match state.library.write() {
    Ok(mut current) => *current = library,
    Err(_) => {
      return import_result(None, Some("Content reloaded on next restart.".to_string()))
    }
  }

  import_result(Some(summary), None)
}

fn import_result(message: Option<String>, error: Option<String>) -> Response {
  let template = ImportTemplate {
    has_message: message.is_some(),
    message: message.unwrap_or_default(),
    has_error: error.is_some(),
    error: error.unwrap_or_default(),
  };
  Html(template.render().unwrap_or_default()).into_response()
}
