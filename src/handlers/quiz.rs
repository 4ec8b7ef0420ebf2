//! Quiz page handlers: render, answer, next, filter, reset, submit.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::{ensure_session, Identity};
use crate::content::QuizDomain;
use crate::error::QuizError;
use crate::quiz::{CategorySelector, QuizView};
use crate::services::{self, SubmissionStatus};
use crate::state::AppState;

use super::templates::QuizTemplate;

#[derive(Deserialize)]
pub struct AnswerForm {
  pub answer: String,
}

#[derive(Deserialize)]
pub struct CategoryForm {
  pub category: String,
}

/// JSON body of `GET /api/quiz/{quiz}/state`
#[derive(Serialize)]
pub struct QuizStateResponse {
  pub quiz: QuizDomain,
  pub view: QuizView,
  pub submission: SubmissionStatus,
  pub signed_in: bool,
}

fn unknown_quiz(err: QuizError) -> Response {
  (StatusCode::NOT_FOUND, Html(format!("<p>{}</p>", err))).into_response()
}

/// Render the quiz page for the session's current state.
fn render_quiz(
  state: &AppState,
  session_id: &str,
  domain: QuizDomain,
  identity: &Identity,
  notice: Option<String>,
) -> Html<String> {
  let view = state.sessions.with_engine(session_id, domain, |engine| engine.view());
  let submission = state.sessions.submission_status(session_id, domain);
  let template = QuizTemplate::build(domain, view, &submission, identity.is_identified(), notice);
  Html(template.render().unwrap_or_default())
}

/// Resolve quiz slug and session cookie shared by every quiz route.
fn resolve(state: &AppState, slug: &str, jar: CookieJar) -> Result<(QuizDomain, CookieJar, String), Response> {
  let domain = slug.parse::<QuizDomain>().map_err(unknown_quiz)?;
  let (jar, session_id) = ensure_session(jar, state.settings.session_expiry_hours);
  Ok((domain, jar, session_id))
}

pub async fn quiz_page(
  State(state): State<AppState>,
  Path(slug): Path<String>,
  identity: Identity,
  jar: CookieJar,
) -> Response {
  let (domain, jar, session_id) = match resolve(&state, &slug, jar) {
    Ok(r) => r,
    Err(response) => return response,
  };
  (jar, render_quiz(&state, &session_id, domain, &identity, None)).into_response()
}

pub async fn quiz_answer(
  State(state): State<AppState>,
  Path(slug): Path<String>,
  identity: Identity,
  jar: CookieJar,
  Form(form): Form<AnswerForm>,
) -> Response {
  let (domain, jar, session_id) = match resolve(&state, &slug, jar) {
    Ok(r) => r,
    Err(response) => return response,
  };

  let result = state
    .sessions
    .with_engine(&session_id, domain, |engine| engine.answer(&form.answer));
  match result {
    Ok(eval) => tracing::debug!("{} answer in session {}: {:?}", domain, session_id, eval.outcome),
    // Repeat clicks and stale pages are ignored
    Err(e) => tracing::debug!("Ignoring answer in session {}: {}", session_id, e),
  }

  (jar, render_quiz(&state, &session_id, domain, &identity, None)).into_response()
}

/// Advance to a new question after the reveal delay. A request that arrives
/// while another is waiting supersedes it; the superseded one just renders
/// whatever is current.
pub async fn quiz_next(
  State(state): State<AppState>,
  Path(slug): Path<String>,
  identity: Identity,
  jar: CookieJar,
) -> Response {
  let (domain, jar, session_id) = match resolve(&state, &slug, jar) {
    Ok(r) => r,
    Err(response) => return response,
  };

  let ticket = state
    .sessions
    .with_engine(&session_id, domain, |engine| engine.begin_next());
  let delay = state.settings.reveal_delay;
  if !delay.is_zero() {
    tokio::time::sleep(delay).await;
  }

  let result = state.sessions.with_engine(&session_id, domain, |engine| {
    engine.finish_next(ticket, &mut rand::rng())
  });
  if let Err(e) = result {
    tracing::debug!("No new {} question: {}", domain, e);
  }

  (jar, render_quiz(&state, &session_id, domain, &identity, None)).into_response()
}

pub async fn quiz_category(
  State(state): State<AppState>,
  Path(slug): Path<String>,
  identity: Identity,
  jar: CookieJar,
  Form(form): Form<CategoryForm>,
) -> Response {
  let (domain, jar, session_id) = match resolve(&state, &slug, jar) {
    Ok(r) => r,
    Err(response) => return response,
  };

  let selector = CategorySelector::parse(&form.category);
  let result = state.sessions.with_engine(&session_id, domain, |engine| {
    engine.select_category(selector, &mut rand::rng()).map(|_| ())
  });
  if let Err(e) = result {
    tracing::debug!("Category '{}' for {}: {}", form.category, domain, e);
  }

  (jar, render_quiz(&state, &session_id, domain, &identity, None)).into_response()
}

pub async fn quiz_reset(
  State(state): State<AppState>,
  Path(slug): Path<String>,
  identity: Identity,
  jar: CookieJar,
) -> Response {
  let (domain, jar, session_id) = match resolve(&state, &slug, jar) {
    Ok(r) => r,
    Err(response) => return response,
  };

  let result = state.sessions.with_engine(&session_id, domain, |engine| {
    engine.reset(&mut rand::rng()).map(|_| ())
  });
  if let Err(e) = result {
    tracing::debug!("Reset {} without a new question: {}", domain, e);
  }

  (jar, render_quiz(&state, &session_id, domain, &identity, None)).into_response()
}

pub async fn quiz_submit(
  State(state): State<AppState>,
  Path(slug): Path<String>,
  identity: Identity,
  jar: CookieJar,
) -> Response {
  let (domain, jar, session_id) = match resolve(&state, &slug, jar) {
    Ok(r) => r,
    Err(response) => return response,
  };

  let notice = match services::submit_score(&state, &session_id, &identity, domain) {
    Ok(_) => None,
    Err(e) => Some(e.to_string()),
  };

  (jar, render_quiz(&state, &session_id, domain, &identity, notice)).into_response()
}

pub async fn quiz_state(
  State(state): State<AppState>,
  Path(slug): Path<String>,
  identity: Identity,
  jar: CookieJar,
) -> Response {
  let (domain, jar, session_id) = match resolve(&state, &slug, jar) {
    Ok(r) => r,
    Err(response) => return response,
  };

  let body = QuizStateResponse {
    quiz: domain,
    view: state.sessions.with_engine(&session_id, domain, |engine| engine.view()),
    submission: state.sessions.submission_status(&session_id, domain),
    signed_in: identity.is_identified(),
  };
  (jar, Json(body)).into_response()
}
