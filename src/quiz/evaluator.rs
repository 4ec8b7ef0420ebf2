//! Rounds and answer evaluation.

use serde::Serialize;

use crate::domain::{Score, Term};
use crate::error::QuizError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
  Correct,
  Wrong,
}

impl Outcome {
  pub fn is_correct(&self) -> bool {
    matches!(self, Self::Correct)
  }
}

/// Result of judging one answer. Always carries the correct meaning so a
/// wrong answer can be followed by a reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
  pub outcome: Outcome,
  pub correct_meaning: String,
  pub submitted: String,
}

/// One live question with its candidate answers.
#[derive(Debug, Clone, Serialize)]
pub struct Round {
  current: Term,
  choices: Vec<String>,
  evaluation: Option<Evaluation>,
}

impl Round {
  pub fn new(current: Term, choices: Vec<String>) -> Self {
    Self {
      current,
      choices,
      evaluation: None,
    }
  }

  pub fn current(&self) -> &Term {
    &self.current
  }

  pub fn choices(&self) -> &[String] {
    &self.choices
  }

  pub fn is_answered(&self) -> bool {
    self.evaluation.is_some()
  }

  pub fn evaluation(&self) -> Option<&Evaluation> {
    self.evaluation.as_ref()
  }
}

/// Judge `submitted` against the round and update `score`.
///
/// Only the first answer per round counts; later attempts return
/// [`QuizError::DuplicateAnswer`] and change nothing. Matching is exact.
pub fn evaluate(round: &mut Round, score: &mut Score, submitted: &str) -> Result<Evaluation, QuizError> {
  if round.is_answered() {
    return Err(QuizError::DuplicateAnswer);
  }

  let outcome = if submitted == round.current.meaning {
    Outcome::Correct
  } else {
    Outcome::Wrong
  };
  score.record(outcome.is_correct());

  let evaluation = Evaluation {
    outcome,
    correct_meaning: round.current.meaning.clone(),
    submitted: submitted.to_string(),
  };
  round.evaluation = Some(evaluation.clone());
  Ok(evaluation)
}
