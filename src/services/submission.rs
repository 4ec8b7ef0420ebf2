//! Score submission to the score store.
//!
//! Submission is fire-and-forget: the caller gets control back immediately and
//! the write happens on a blocking task. The outcome only updates the
//! session's [`SubmissionStatus`]; the local score is never touched and a
//! failed write is not retried.

use serde::Serialize;
use std::sync::Arc;

use crate::auth::Identity;
use crate::content::QuizDomain;
use crate::db::{self, try_lock, DbPool};
use crate::domain::Score;
use crate::error::QuizError;
use crate::state::AppState;

/// Latest submission state for one quiz in one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Saved,
    Failed(String),
}

impl SubmissionStatus {
    /// Notice shown to the user, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            SubmissionStatus::Idle => None,
            SubmissionStatus::Pending => Some("Saving score...".to_string()),
            SubmissionStatus::Saved => Some("Score saved".to_string()),
            SubmissionStatus::Failed(reason) => Some(format!("Could not save score: {}", reason)),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SubmissionStatus::Failed(_))
    }
}

/// Write a score synchronously, unless `still_current` says the write has
/// been superseded. The check runs while the store is locked, so writes land
/// in submission order. Returns whether the row was written.
pub fn persist_score(
    pool: &DbPool,
    user_id: &str,
    quiz_name: &str,
    score: Score,
    still_current: impl FnOnce() -> bool,
) -> Result<bool, QuizError> {
    let conn = try_lock(pool).map_err(|e| QuizError::PersistenceFailure(e.to_string()))?;
    if !still_current() {
        return Ok(false);
    }
    db::upsert_score(&conn, user_id, quiz_name, score)
        .map_err(|e| QuizError::PersistenceFailure(e.to_string()))?;
    Ok(true)
}

/// Start saving the session's current score for `domain`.
///
/// Anonymous identities are rejected before anything is written. On success
/// returns the score snapshot being saved; the write itself completes in the
/// background. A later submission for the same session and quiz supersedes
/// this one: if it is still waiting for the store, it neither writes nor
/// reports. Must be called from within a Tokio runtime.
pub fn submit_score(
    state: &AppState,
    session_id: &str,
    identity: &Identity,
    domain: QuizDomain,
) -> Result<Score, QuizError> {
    let user_id = identity
        .user_id()
        .ok_or(QuizError::AnonymousSubmission)?
        .to_string();

    let score = state.sessions.with_engine(session_id, domain, |engine| engine.score());
    let ticket = state.sessions.begin_submission(session_id, domain);

    let state = state.clone();
    let session_id = session_id.to_string();
    tokio::spawn(async move {
        let pool = state.db.clone();
        let sessions = Arc::clone(&state.sessions);
        let sid = session_id.clone();
        let user = user_id.clone();
        let result = tokio::task::spawn_blocking(move || {
            persist_score(&pool, &user, domain.quiz_name(), score, || {
                sessions.is_latest_submission(&sid, domain, ticket)
            })
        })
        .await
        .unwrap_or_else(|e| Err(QuizError::PersistenceFailure(e.to_string())));

        let status = match result {
            Ok(true) => {
                tracing::info!(
                    "Saved {} score {} for user {}",
                    domain,
                    score.ratio(),
                    user_id
                );
                SubmissionStatus::Saved
            }
            Ok(false) => {
                tracing::debug!("Skipped superseded {} score {} for user {}", domain, score.ratio(), user_id);
                return;
            }
            Err(e) => {
                tracing::warn!("Score submission for user {} failed: {}", user_id, e);
                SubmissionStatus::Failed(e.to_string())
            }
        };
        state
            .sessions
            .finish_submission(&session_id, domain, ticket, status);
    });

    Ok(score)
}
