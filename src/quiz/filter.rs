//! Category filtering over a question bank.

use serde::{Deserialize, Serialize};

use crate::domain::{normalize_category, Term};

/// Selector id meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// Which part of the bank is eligible for questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategorySelector {
  #[default]
  All,
  Category(String),
}

impl CategorySelector {
  /// Parse a selector id from a form or query string.
  /// Blank input and "all" (any casing) select everything.
  pub fn parse(s: &str) -> Self {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_CATEGORIES) {
      Self::All
    } else {
      Self::Category(trimmed.to_string())
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::All => ALL_CATEGORIES,
      Self::Category(c) => c,
    }
  }
}

/// Stable-order subsequence of `bank` eligible under `selector`.
pub fn filter_terms(bank: &[Term], selector: &CategorySelector) -> Vec<Term> {
  match selector {
    CategorySelector::All => bank.to_vec(),
    CategorySelector::Category(category) => {
      let wanted = normalize_category(category);
      bank.iter().filter(|t| t.in_category(&wanted)).cloned().collect()
    }
  }
}
