//! Question generation: pick a term, assemble shuffled answer choices.

use std::collections::HashSet;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::domain::Term;

use super::evaluator::Round;

/// Choices shown per question, correct answer included.
pub const DEFAULT_CHOICE_COUNT: usize = 4;

/// Build a new round from `active`, drawing distractors from `bank`.
///
/// Distractors come from the full bank rather than the filtered set so a
/// narrow category still yields varied wrong answers. Returns `None` when
/// `active` is empty.
pub fn next_round<R: Rng + ?Sized>(
  active: &[Term],
  bank: &[Term],
  choice_count: usize,
  rng: &mut R,
) -> Option<Round> {
  let current = active.choose(rng)?.clone();
  let choices = generate_choices(&current, bank, choice_count, rng);
  Some(Round::new(current, choices))
}

/// Correct meaning plus up to `choice_count - 1` distinct distractor meanings,
/// in uniformly random order.
///
/// When the bank holds fewer distinct meanings than requested, stops once every
/// available meaning is used (down to a single choice).
pub fn generate_choices<R: Rng + ?Sized>(
  correct: &Term,
  bank: &[Term],
  choice_count: usize,
  rng: &mut R,
) -> Vec<String> {
  let available = bank
    .iter()
    .map(|t| t.meaning.as_str())
    .filter(|m| *m != correct.meaning)
    .collect::<HashSet<_>>()
    .len();
  let target = choice_count.max(1).min(available + 1);

  let mut choices = vec![correct.meaning.clone()];
  while choices.len() < target {
    let Some(candidate) = bank.choose(rng) else {
      break;
    };
    if !choices.contains(&candidate.meaning) {
      choices.push(candidate.meaning.clone());
    }
  }

  choices.shuffle(rng);
  choices
}
