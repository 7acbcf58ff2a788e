//! Username cookie and CEFR level handlers.
//!
//! The cookie identifies the owner of cards and progress rows; there is no
//! authentication attached to it.

use axum::extract::{Form, State};
use axum::response::{IntoResponse, Redirect};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Utc;
use serde::Deserialize;

use crate::db::{self, LogOnError};
use crate::state::AppState;

use super::{current_user, USERNAME_COOKIE};

#[derive(Deserialize)]
pub struct UserForm {
  pub username: String,
}

/// POST /user - pick a username, creating the user row on first use
pub async fn set_user(
  State(state): State<AppState>,
  jar: CookieJar,
  Form(form): Form<UserForm>,
) -> impl IntoResponse {
  let username = form.username.trim().to_string();
  if username.is_empty() {
    return (jar, Redirect::to("/"));
  }

  if let Ok(conn) = db::try_lock(&state.db) {
    db::create_user(&conn, &username, Utc::now()).log_warn("Failed to create user");
  }

  let cookie = Cookie::build((USERNAME_COOKIE, username))
    .path("/")
    .http_only(false);

  (jar.add(cookie), Redirect::to("/"))
}

#[derive(Deserialize)]
pub struct LevelForm {
  pub level: String,
}

/// POST /user/level - store the CEFR self-assessment
pub async fn set_level(
  State(state): State<AppState>,
  jar: CookieJar,
  Form(form): Form<LevelForm>,
) -> impl IntoResponse {
  if let Some(username) = current_user(&jar) {
    if let Ok(conn) = db::try_lock(&state.db) {
      db::set_current_level(&conn, &username, &form.level).log_warn("Failed to store level");
    }
  }
  Redirect::to("/")
}
