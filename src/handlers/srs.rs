//! Flashcard review flow over the SRS scheduler.
//!
//! The scheduler is built per request around a store scoped to the
//! connection lock, so each register/review is a single atomic operation.

use askama::Template;
use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::Deserialize;

use crate::db::{self, SqliteStore};
use crate::srs::{Scheduler, SrsError};
use crate::state::AppState;

use super::{current_user, error_page};

#[derive(Template)]
#[template(path = "srs.html")]
pub struct SrsTemplate {
  pub due_count: i64,
  pub has_card: bool,
  pub front: String,
  pub back: String,
  pub seed_count: usize,
  pub message: String,
  pub has_message: bool,
}

pub async fn srs_page(State(state): State<AppState>, jar: CookieJar) -> Response {
  let Some(username) = current_user(&jar) else {
    return Redirect::to("/").into_response();
  };
  page(&state, &username, None)
}

#[derive(Deserialize)]
pub struct ReviewForm {
  pub front: String,
  pub quality: u8,
}

/// POST /srs/review - apply a quality rating, then present the next card
pub async fn submit_review(
  State(state): State<AppState>,
  jar: CookieJar,
  Form(form): Form<ReviewForm>,
) -> Response {
  let Some(username) = current_user(&jar) else {
    return Redirect::to("/").into_response();
  };

  let message = {
    let conn = match db::try_lock(&state.db) {
      Ok(conn) => conn,
      Err(_) => return error_page().into_response(),
    };
    let mut scheduler = Scheduler::new(SqliteStore::new(&conn), state.policy);

    match scheduler.review(&username, &form.front, form.quality, Utc::now()) {
      Ok(card) => format!(
        "Saved. Next review of \"{}\" in {} day(s).",
        card.front,
        card.interval.ceil() as i64
      ),
      Err(SrsError::CardNotFound { front, .. }) => {
        format!("No card named \"{}\" exists anymore.", front)
      }
      Err(SrsError::InvalidQuality(q)) => format!("Rating {} is not on the 0-5 scale.", q),
      Err(SrsError::Storage(e)) => {
        tracing::warn!("Review failed: {}", e);
        return error_page().into_response();
      }
    }
  };

  page(&state, &username, Some(message))
}

#[derive(Deserialize)]
pub struct AddCardForm {
  pub front: String,
  pub back: String,
}

/// POST /srs/add - register a card by hand
pub async fn add_card(
  State(state): State<AppState>,
  jar: CookieJar,
  Form(form): Form<AddCardForm>,
) -> Response {
  let Some(username) = current_user(&jar) else {
    return Redirect::to("/").into_response();
  };

  let front = form.front.trim();
  let back = form.back.trim();
  if front.is_empty() || back.is_empty() {
    return page(&state, &username, Some("Fill in both sides of the card.".to_string()));
  }

  let message = {
    let conn = match db::try_lock(&state.db) {
      Ok(conn) => conn,
      Err(_) => return error_page().into_response(),
    };
    let mut scheduler = Scheduler::new(SqliteStore::new(&conn), state.policy);

    match scheduler.register_card(&username, front, back, Utc::now()) {
      Ok(_) => format!("Card \"{}\" added. First review tomorrow.", front),
      Err(e) => {
        tracing::warn!("Failed to add card: {}", e);
        return error_page().into_response();
      }
    }
  };

  page(&state, &username, Some(message))
}

/// POST /srs/import - register every seed card from the content library
pub async fn import_cards(State(state): State<AppState>, jar: CookieJar) -> Response {
  let Some(username) = current_user(&jar) else {
    return Redirect::to("/").into_response();
  };

  let seeds = match state.library.read() {
    Ok(library) => library.srs_cards.clone(),
    Err(_) => Vec::new(),
  };

  let message = {
    let conn = match db::try_lock(&state.db) {
      Ok(conn) => conn,
      Err(_) => return error_page().into_response(),
    };
    let mut scheduler = Scheduler::new(SqliteStore::new(&conn), state.policy);

    let mut imported = 0;
    for seed in &seeds {
      match scheduler.register_card(&username, &seed.front, &seed.back, Utc::now()) {
        Ok(_) => imported += 1,
        Err(e) => tracing::warn!("Failed to import card \"{}\": {}", seed.front, e),
      }
    }
    format!("{} card(s) imported.", imported)
  };

  page(&state, &username, Some(message))
}

fn page(state: &AppState, username: &str, message: Option<String>) -> Response {
  let conn = match db::try_lock(&state.db) {
    Ok(conn) => conn,
    Err(_) => return error_page().into_response(),
  };

  let today = Utc::now().date_naive();
  let (due_count, card) = {
    let scheduler = Scheduler::new(SqliteStore::new(&conn), state.policy);

    let due_count = match db::get_due_count(&conn, username, today) {
      Ok(count) => count,
      Err(e) => {
        tracing::warn!("Failed to count due cards: {}", e);
        0
      }
    };

    let card = match scheduler.pick_due(username, today) {
      Ok(card) => card,
      Err(e) => {
        tracing::warn!("Failed to pick a due card: {}", e);
        None
      }
    };
    (due_count, card)
  };
  drop(conn);

  let seed_count = state.library.read().map(|l| l.srs_cards.len()).unwrap_or(0);

  let template = match card {
    Some(card) => SrsTemplate {
      due_count,
      has_card: true,
      front: card.front,
      back: card.back,
      seed_count,
      has_message: message.is_some(),
      message: message.unwrap_or_default(),
    },
    None => SrsTemplate {
      due_count,
      has_card: false,
      front: String::new(),
      back: String::new(),
      seed_count,
      has_message: message.is_some(),
      message: message.unwrap_or_default(),
    },
  };
  Html(template.render().unwrap_or_default()).into_response()
}
