//! Per-domain quiz state: filter, live round, running score.
//!
//! Round lifecycle:
//! `NoRound -> Unanswered -> Answered -> Unanswered -> ...`, with a fall back
//! to `NoRound` whenever the active set becomes empty.

use std::sync::Arc;

use rand::Rng;
use serde::Serialize;

use crate::content::TermBank;
use crate::domain::{Score, Term};
use crate::error::QuizError;

use super::evaluator::{self, Evaluation, Round};
use super::filter::{filter_terms, CategorySelector};
use super::generator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundState {
  NoRound,
  Unanswered,
  Answered,
}

/// Handle for a deferred round generation. Only the most recently issued
/// ticket may complete; any state change issues a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket(u64);

pub struct QuizEngine {
  bank: Arc<TermBank>,
  choice_count: usize,
  selector: CategorySelector,
  active: Vec<Term>,
  round: Option<Round>,
  score: Score,
  generation: u64,
}

impl QuizEngine {
  /// New engine over the whole bank with no live round yet.
  pub fn new(bank: Arc<TermBank>, choice_count: usize) -> Self {
    let active = bank.terms().to_vec();
    Self {
      bank,
      choice_count,
      selector: CategorySelector::All,
      active,
      round: None,
      score: Score::default(),
      generation: 0,
    }
  }

  pub fn selector(&self) -> &CategorySelector {
    &self.selector
  }

  pub fn active_set(&self) -> &[Term] {
    &self.active
  }

  pub fn round(&self) -> Option<&Round> {
    self.round.as_ref()
  }

  pub fn score(&self) -> Score {
    self.score
  }

  pub fn is_category_empty(&self) -> bool {
    self.active.is_empty()
  }

  pub fn state(&self) -> RoundState {
    match &self.round {
      None => RoundState::NoRound,
      Some(r) if r.is_answered() => RoundState::Answered,
      Some(_) => RoundState::Unanswered,
    }
  }

  /// Change the category filter. The live round is discarded and a new one
  /// drawn from the new active set; the score is kept.
  pub fn select_category<R: Rng + ?Sized>(
    &mut self,
    selector: CategorySelector,
    rng: &mut R,
  ) -> Result<&Round, QuizError> {
    self.active = filter_terms(self.bank.terms(), &selector);
    tracing::debug!(
      "Category filter '{}' matches {} of {} terms",
      selector.as_str(),
      self.active.len(),
      self.bank.len()
    );
    self.selector = selector;
    self.round = None;
    self.next_round(rng)
  }

  /// Judge an answer for the live round.
  pub fn answer(&mut self, submitted: &str) -> Result<Evaluation, QuizError> {
    let round = self.round.as_mut().ok_or(QuizError::NoRound)?;
    evaluator::evaluate(round, &mut self.score, submitted)
  }

  /// Start a deferred generation, superseding any pending one.
  pub fn begin_next(&mut self) -> GenerationTicket {
    self.generation += 1;
    GenerationTicket(self.generation)
  }

  /// Complete a deferred generation. Returns `Ok(false)` without touching
  /// state when a newer request superseded `ticket`.
  pub fn finish_next<R: Rng + ?Sized>(
    &mut self,
    ticket: GenerationTicket,
    rng: &mut R,
  ) -> Result<bool, QuizError> {
    if ticket.0 != self.generation {
      tracing::debug!("Dropping superseded round generation {}", ticket.0);
      return Ok(false);
    }
    self.generate(rng)?;
    Ok(true)
  }

  /// Replace the live round immediately.
  pub fn next_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Round, QuizError> {
    let ticket = self.begin_next();
    self.finish_next(ticket, rng)?;
    self.round.as_ref().ok_or(QuizError::NoRound)
  }

  /// Zero the score and draw a fresh round under the current filter.
  pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Round, QuizError> {
    self.score = Score::default();
    self.next_round(rng)
  }

  fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), QuizError> {
    match generator::next_round(&self.active, self.bank.terms(), self.choice_count, rng) {
      Some(round) => {
        self.round = Some(round);
        Ok(())
      }
      None => {
        self.round = None;
        Err(QuizError::EmptyActiveSet)
      }
    }
  }

  /// Snapshot for rendering.
  pub fn view(&self) -> QuizView {
    let round = self.round.as_ref();
    QuizView {
      selected_category: self.selector.as_str().to_string(),
      empty_category: self.is_category_empty(),
      state: self.state(),
      term: round.map(|r| r.current().term.clone()),
      choices: round.map(|r| r.choices().to_vec()).unwrap_or_default(),
      evaluation: round.and_then(|r| r.evaluation().cloned()),
      correct: self.score.correct(),
      total: self.score.total(),
      ratio: self.score.ratio(),
      percentage: self.score.percentage(),
    }
  }
}

/// Serializable view of an engine, shared by the HTML page and the JSON API.
#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
  pub selected_category: String,
  pub empty_category: bool,
  pub state: RoundState,
  pub term: Option<String>,
  pub choices: Vec<String>,
  pub evaluation: Option<Evaluation>,
  pub correct: u32,
  pub total: u32,
  pub ratio: String,
  pub percentage: u32,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::quiz::Outcome;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn engine() -> QuizEngine {
    let bank = TermBank::new(vec![
      Term::new("A", "x", "c1"),
      Term::new("B", "y", "c1"),
      Term::new("C", "z", "c2"),
    ]);
    QuizEngine::new(Arc::new(bank), 4)
  }

  fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
  }

  #[test]
  fn test_new_engine_has_no_round() {
    let engine = engine();
    assert_eq!(engine.state(), RoundState::NoRound);
    assert_eq!(engine.active_set().len(), 3);
  }

  #[test]
  fn test_round_lifecycle() {
    let mut engine = engine();
    let mut rng = rng();
    engine.next_round(&mut rng).unwrap();
    assert_eq!(engine.state(), RoundState::Unanswered);

    let meaning = engine.round().unwrap().current().meaning.clone();
    let eval = engine.answer(&meaning).unwrap();
    assert_eq!(eval.outcome, Outcome::Correct);
    assert_eq!(engine.state(), RoundState::Answered);

    engine.next_round(&mut rng).unwrap();
    assert_eq!(engine.state(), RoundState::Unanswered);
    assert_eq!(engine.score().total(), 1);
  }

  #[test]
  fn test_answer_without_round() {
    let mut engine = engine();
    assert_eq!(engine.answer("x"), Err(QuizError::NoRound));
  }

  #[test]
  fn test_duplicate_answer_leaves_score() {
    let mut engine = engine();
    let mut rng = rng();
    engine.next_round(&mut rng).unwrap();
    engine.answer("definitely wrong").unwrap();
    let meaning = engine.round().unwrap().current().meaning.clone();
    assert_eq!(engine.answer(&meaning), Err(QuizError::DuplicateAnswer));
    assert_eq!(engine.score().correct(), 0);
    assert_eq!(engine.score().total(), 1);
  }

  #[test]
  fn test_filter_to_category() {
    let mut engine = engine();
    let mut rng = rng();
    for _ in 0..50 {
      let round = engine.select_category(CategorySelector::parse("C1"), &mut rng).unwrap();
      assert!(round.current().term == "A" || round.current().term == "B");
    }
    assert_eq!(engine.active_set().len(), 2);
  }

  #[test]
  fn test_empty_category_clears_round_and_keeps_score() {
    let mut engine = engine();
    let mut rng = rng();
    engine.next_round(&mut rng).unwrap();
    let meaning = engine.round().unwrap().current().meaning.clone();
    engine.answer(&meaning).unwrap();

    let result = engine.select_category(CategorySelector::parse("nothing"), &mut rng);
    assert_eq!(result.err(), Some(QuizError::EmptyActiveSet));
    assert_eq!(engine.state(), RoundState::NoRound);
    assert!(engine.is_category_empty());
    assert_eq!(engine.score().correct(), 1);
    assert_eq!(engine.score().total(), 1);

    // Next and reset cannot produce a round until the filter changes
    assert_eq!(engine.next_round(&mut rng).err(), Some(QuizError::EmptyActiveSet));
    assert_eq!(engine.state(), RoundState::NoRound);

    engine.select_category(CategorySelector::All, &mut rng).unwrap();
    assert_eq!(engine.state(), RoundState::Unanswered);
  }

  #[test]
  fn test_reset_zeroes_score_and_keeps_filter() {
    let mut engine = engine();
    let mut rng = rng();
    engine.select_category(CategorySelector::parse("c2"), &mut rng).unwrap();
    engine.answer("z").unwrap();
    assert_eq!(engine.score().total(), 1);

    let round = engine.reset(&mut rng).unwrap();
    assert_eq!(round.current().term, "C");
    assert_eq!(engine.score(), Score::default());
    assert_eq!(engine.selector(), &CategorySelector::parse("c2"));
    assert_eq!(engine.state(), RoundState::Unanswered);
  }

  #[test]
  fn test_reset_on_empty_category_still_zeroes_score() {
    let mut engine = engine();
    let mut rng = rng();
    engine.next_round(&mut rng).unwrap();
    engine.answer("wrong").unwrap();
    let _ = engine.select_category(CategorySelector::parse("none"), &mut rng);

    assert_eq!(engine.reset(&mut rng).err(), Some(QuizError::EmptyActiveSet));
    assert_eq!(engine.score(), Score::default());
  }

  #[test]
  fn test_superseded_ticket_is_dropped() {
    let mut engine = engine();
    let mut rng = rng();
    let stale = engine.begin_next();
    let fresh = engine.begin_next();

    assert_eq!(engine.finish_next(stale, &mut rng), Ok(false));
    assert_eq!(engine.state(), RoundState::NoRound);
    assert_eq!(engine.finish_next(fresh, &mut rng), Ok(true));
    assert_eq!(engine.state(), RoundState::Unanswered);
  }

  #[test]
  fn test_category_change_supersedes_pending_generation() {
    let mut engine = engine();
    let mut rng = rng();
    let pending = engine.begin_next();
    engine.select_category(CategorySelector::parse("c2"), &mut rng).unwrap();
    assert_eq!(engine.finish_next(pending, &mut rng), Ok(false));
    assert_eq!(engine.round().unwrap().current().term, "C");
  }

  #[test]
  fn test_view_reflects_state() {
    let mut engine = engine();
    let mut rng = rng();
    engine.next_round(&mut rng).unwrap();
    engine.answer("nope").unwrap();

    let view = engine.view();
    assert_eq!(view.selected_category, "all");
    assert_eq!(view.state, RoundState::Answered);
    assert_eq!(view.choices.len(), 3);
    assert_eq!(view.ratio, "0 / 1");
    assert_eq!(view.percentage, 0);
    assert_eq!(view.evaluation.unwrap().outcome, Outcome::Wrong);
  }
}
