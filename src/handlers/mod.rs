pub mod quiz;
pub mod templates;

use askama::Template;
use axum::{extract::State, response::Html, routing::get, routing::post, Router};
use tower_http::trace::TraceLayer;

use crate::auth::Identity;
use crate::content::QuizDomain;
use crate::db::{self, try_lock, LogOnError};
use crate::state::AppState;

use templates::{IndexTemplate, QuizLink};

pub use quiz::{
  quiz_answer, quiz_category, quiz_next, quiz_page, quiz_reset, quiz_state, quiz_submit,
  AnswerForm, CategoryForm,
};

/// All application routes.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/", get(index))
    .route("/health", get(health))
    .route("/quiz/{quiz}", get(quiz_page))
    .route("/quiz/{quiz}/answer", post(quiz_answer))
    .route("/quiz/{quiz}/next", post(quiz_next))
    .route("/quiz/{quiz}/category", post(quiz_category))
    .route("/quiz/{quiz}/reset", post(quiz_reset))
    .route("/quiz/{quiz}/submit", post(quiz_submit))
    .route("/api/quiz/{quiz}/state", get(quiz_state))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

pub async fn index(State(state): State<AppState>, identity: Identity) -> Html<String> {
  let cumulative = identity.user_id().and_then(|user_id| {
    let conn = try_lock(&state.db).log_warn("Cannot read cumulative score")?;
    db::get_cumulative_score(&conn, user_id).log_warn("Failed to load cumulative score")
  });

  let template = IndexTemplate {
    quizzes: QuizDomain::ALL
      .iter()
      .map(|d| QuizLink {
        slug: d.as_str(),
        title: d.title(),
      })
      .collect(),
    signed_in: identity.is_identified(),
    cumulative_ratio: cumulative.map(|s| s.ratio()),
    cumulative_percentage: cumulative.map(|s| s.percentage()).unwrap_or(0),
  };

  Html(template.render().unwrap_or_default())
}

pub async fn health() -> &'static str {
  "ok"
}
