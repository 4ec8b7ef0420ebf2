//! Question bank loading.
//!
//! Each quiz domain ships a built-in bank embedded at compile time. A bank file
//! configured for a domain replaces the built-in one. Banks are JSON arrays of
//! `{ "term", "meaning", "category" }` records and are read-only once loaded.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::config::Settings;
use crate::domain::{normalize_category, Term};

use super::QuizDomain;

const BUILTIN_TERMS: &str = include_str!("../../data/terms.json");
const BUILTIN_VOCABULARY: &str = include_str!("../../data/vocabulary.json");

#[derive(Error, Debug)]
pub enum BankError {
    #[error("Failed to read bank file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid bank JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable ordered list of terms.
#[derive(Debug, Clone, Default)]
pub struct TermBank {
    terms: Vec<Term>,
}

impl TermBank {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let terms: Vec<Term> = serde_json::from_str(json)?;
        Ok(Self { terms })
    }

    pub fn load(path: &Path) -> Result<Self, BankError> {
        let contents = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// The bank compiled into the binary for `domain`.
    pub fn builtin(domain: QuizDomain) -> Result<Self, BankError> {
        match domain {
            QuizDomain::Terms => Self::from_json(BUILTIN_TERMS),
            QuizDomain::Vocabulary => Self::from_json(BUILTIN_VOCABULARY),
        }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Normalized category labels present in the bank.
    pub fn categories(&self) -> BTreeSet<String> {
        self.terms
            .iter()
            .map(|t| normalize_category(&t.category))
            .collect()
    }
}

/// One shared bank per quiz domain.
#[derive(Debug, Clone)]
pub struct QuestionBanks {
    terms: Arc<TermBank>,
    vocabulary: Arc<TermBank>,
}

impl QuestionBanks {
    pub fn new(terms: TermBank, vocabulary: TermBank) -> Self {
        Self {
            terms: Arc::new(terms),
            vocabulary: Arc::new(vocabulary),
        }
    }

    /// Load each domain's bank from its configured file, or the built-in
    /// bank when none is configured.
    pub fn load(settings: &Settings) -> Result<Self, BankError> {
        let terms = load_domain(QuizDomain::Terms, settings.terms_bank.as_deref())?;
        let vocabulary = load_domain(QuizDomain::Vocabulary, settings.vocabulary_bank.as_deref())?;
        Ok(Self::new(terms, vocabulary))
    }

    pub fn for_domain(&self, domain: QuizDomain) -> Arc<TermBank> {
        match domain {
            QuizDomain::Terms => Arc::clone(&self.terms),
            QuizDomain::Vocabulary => Arc::clone(&self.vocabulary),
        }
    }
}

fn load_domain(domain: QuizDomain, path: Option<&Path>) -> Result<TermBank, BankError> {
    let bank = match path {
        Some(path) => {
            tracing::info!("Loading {} bank from {}", domain, path.display());
            TermBank::load(path)?
        }
        None => TermBank::builtin(domain)?,
    };

    if bank.is_empty() {
        tracing::warn!("Question bank for {} is empty", domain);
    } else {
        tracing::info!(
            "Loaded {} {} terms across {} categories",
            bank.len(),
            domain,
            bank.categories().len()
        );
    }
    Ok(bank)
}
