use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// One vocabulary or definition pair tagged with a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
  pub term: String,
  pub meaning: String,
  pub category: String,
}

impl Term {
  pub fn new(term: &str, meaning: &str, category: &str) -> Self {
    Self {
      term: term.to_string(),
      meaning: meaning.to_string(),
      category: category.to_string(),
    }
  }

  /// True if this term's category equals `normalized` (already run through
  /// [`normalize_category`]).
  pub fn in_category(&self, normalized: &str) -> bool {
    normalize_category(&self.category) == normalized
  }
}

/// Canonical form of a category label for comparison.
///
/// Source data mixes casing, stray whitespace and full-width forms
/// ("Security ", "ＳＥＣＵＲＩＴＹ"), so labels are NFKC-folded, trimmed and
/// lowercased before they are compared.
pub fn normalize_category(category: &str) -> String {
  category.nfkc().collect::<String>().trim().to_lowercase()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalize_trims_and_lowercases() {
    assert_eq!(normalize_category("  Security "), "security");
    assert_eq!(normalize_category("DATABASE"), "database");
  }

  #[test]
  fn test_normalize_folds_full_width() {
    assert_eq!(normalize_category("ＳＥＣＵＲＩＴＹ"), "security");
    // Ideographic space is whitespace after NFKC
    assert_eq!(normalize_category("\u{3000}食\u{3000}"), "食");
  }

  #[test]
  fn test_in_category_uses_normalized_label() {
    let term = Term::new("Firewall", "Filters traffic", " Security");
    assert!(term.in_category("security"));
    assert!(!term.in_category("database"));
  }
}
