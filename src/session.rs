//! In-memory quiz sessions keyed by the session cookie.
//!
//! Each browser session owns one independent [`QuizEngine`] per quiz domain
//! plus the status of its latest score submission. Sessions expire after a
//! configurable period of inactivity.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config;
use crate::content::{QuestionBanks, QuizDomain};
use crate::quiz::QuizEngine;
use crate::services::SubmissionStatus;

#[derive(Default)]
struct QuizSession {
  engines: HashMap<QuizDomain, QuizEngine>,
  submissions: HashMap<QuizDomain, SubmissionSlot>,
}

/// Status of the latest submission plus the sequence number that owns it.
#[derive(Default)]
struct SubmissionSlot {
  seq: u64,
  status: SubmissionStatus,
}

/// Identifies one score submission. Only the latest ticket for a session and
/// domain may write the score or report an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

/// Session entry with last access time for expiration
struct SessionEntry {
  session: QuizSession,
  last_access: DateTime<Utc>,
}

pub struct SessionStore {
  sessions: Mutex<HashMap<String, SessionEntry>>,
  banks: QuestionBanks,
  choice_count: usize,
  expiry: Duration,
}

impl SessionStore {
  pub fn new(banks: QuestionBanks, choice_count: usize, expiry_hours: i64) -> Self {
    Self {
      sessions: Mutex::new(HashMap::new()),
      banks,
      choice_count,
      expiry: Duration::hours(expiry_hours),
    }
  }

  /// Run `f` against the session's engine for `domain`, creating the session
  /// and engine on first use. A new engine starts with a round already drawn.
  pub fn with_engine<T>(
    &self,
    session_id: &str,
    domain: QuizDomain,
    f: impl FnOnce(&mut QuizEngine) -> T,
  ) -> T {
    let mut sessions = self.lock();

    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      self.cleanup_expired(&mut sessions);
    }

    let entry = Self::touch(&mut sessions, session_id);
    let engine = entry
      .session
      .engines
      .entry(domain)
      .or_insert_with(|| self.new_engine(domain));
    f(engine)
  }

  pub fn submission_status(&self, session_id: &str, domain: QuizDomain) -> SubmissionStatus {
    self
      .lock()
      .get(session_id)
      .and_then(|entry| entry.session.submissions.get(&domain))
      .map(|slot| slot.status.clone())
      .unwrap_or_default()
  }

  /// Mark a new submission pending, superseding any in flight.
  pub fn begin_submission(&self, session_id: &str, domain: QuizDomain) -> SubmissionTicket {
    let mut sessions = self.lock();
    let slot = Self::touch(&mut sessions, session_id)
      .session
      .submissions
      .entry(domain)
      .or_default();
    slot.seq += 1;
    slot.status = SubmissionStatus::Pending;
    SubmissionTicket(slot.seq)
  }

  pub fn is_latest_submission(&self, session_id: &str, domain: QuizDomain, ticket: SubmissionTicket) -> bool {
    self
      .lock()
      .get(session_id)
      .and_then(|entry| entry.session.submissions.get(&domain))
      .is_some_and(|slot| slot.seq == ticket.0)
  }

  /// Record the outcome of `ticket`. Returns false, leaving the status alone,
  /// when a newer submission has started since.
  pub fn finish_submission(
    &self,
    session_id: &str,
    domain: QuizDomain,
    ticket: SubmissionTicket,
    status: SubmissionStatus,
  ) -> bool {
    let mut sessions = self.lock();
    match sessions
      .get_mut(session_id)
      .and_then(|entry| entry.session.submissions.get_mut(&domain))
    {
      Some(slot) if slot.seq == ticket.0 => {
        slot.status = status;
        true
      }
      _ => false,
    }
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn new_engine(&self, domain: QuizDomain) -> QuizEngine {
    let mut engine = QuizEngine::new(self.banks.for_domain(domain), self.choice_count);
    if let Err(e) = engine.next_round(&mut rand::rng()) {
      tracing::warn!("Cannot start {} quiz: {}", domain, e);
    }
    engine
  }

  fn touch<'a>(sessions: &'a mut HashMap<String, SessionEntry>, session_id: &str) -> &'a mut SessionEntry {
    let entry = sessions
      .entry(session_id.to_string())
      .or_insert_with(|| SessionEntry {
        session: QuizSession::default(),
        last_access: Utc::now(),
      });
    entry.last_access = Utc::now();
    entry
  }

  fn cleanup_expired(&self, sessions: &mut HashMap<String, SessionEntry>) {
    let cutoff = Utc::now() - self.expiry;
    let before = sessions.len();
    sessions.retain(|_, entry| entry.last_access > cutoff);
    let removed = before - sessions.len();
    if removed > 0 {
      tracing::debug!("Expired {} quiz sessions", removed);
    }
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
    // Session state stays usable even if a handler panicked mid-update
    self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}
