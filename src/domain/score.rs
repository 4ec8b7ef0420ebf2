use serde::{Deserialize, Serialize};

/// Running tally of answered rounds. `correct <= total` always holds because
/// the only mutator is [`Score::record`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
  correct: u32,
  total: u32,
}

impl Score {
  /// Build a score from stored values. Returns `None` when `correct > total`.
  pub fn from_parts(correct: u32, total: u32) -> Option<Self> {
    (correct <= total).then_some(Self { correct, total })
  }

  pub fn correct(&self) -> u32 {
    self.correct
  }

  pub fn total(&self) -> u32 {
    self.total
  }

  pub fn record(&mut self, was_correct: bool) {
    self.total += 1;
    if was_correct {
      self.correct += 1;
    }
  }

  /// Share of correct answers as a whole percentage, rounding half up.
  /// An empty score reports 0.
  pub fn percentage(&self) -> u32 {
    if self.total == 0 {
      return 0;
    }
    let correct = u64::from(self.correct);
    let total = u64::from(self.total);
    ((200 * correct + total) / (2 * total)) as u32
  }

  /// "correct / total", as shown next to the percentage.
  pub fn ratio(&self) -> String {
    format!("{} / {}", self.correct, self.total)
  }
}

impl std::ops::Add for Score {
  type Output = Score;

  fn add(self, other: Score) -> Score {
    Score {
      correct: self.correct.saturating_add(other.correct),
      total: self.total.saturating_add(other.total),
    }
  }
}

impl std::iter::Sum for Score {
  fn sum<I: Iterator<Item = Score>>(iter: I) -> Score {
    iter.fold(Score::default(), |acc, s| acc + s)
  }
}
