//! Quiz content: the two quiz domains, their category catalogs and banks.

pub mod bank;

pub use bank::{BankError, QuestionBanks, TermBank};

use serde::{Deserialize, Serialize};

use crate::quiz::ALL_CATEGORIES;

/// A selectable category: the id stored in bank records and the label shown
/// on the filter.
pub struct CategoryInfo {
    pub id: &'static str,
    pub label: &'static str,
}

pub const TERMS_CATEGORIES: [CategoryInfo; 6] = [
    CategoryInfo { id: ALL_CATEGORIES, label: "All" },
    CategoryInfo { id: "security", label: "Security" },
    CategoryInfo { id: "fundamentals", label: "Fundamentals" },
    CategoryInfo { id: "development", label: "Development" },
    CategoryInfo { id: "infrastructure", label: "Infrastructure" },
    CategoryInfo { id: "database", label: "Database" },
];

pub const VOCABULARY_CATEGORIES: [CategoryInfo; 4] = [
    CategoryInfo { id: ALL_CATEGORIES, label: "All" },
    CategoryInfo { id: "食", label: "Food & drink" },
    CategoryInfo { id: "病名", label: "Illness & symptoms" },
    CategoryInfo { id: "日常", label: "Daily life" },
];

/// The independent quizzes offered by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizDomain {
    /// IT exam technical terms
    Terms,
    /// English vocabulary with Japanese meanings
    Vocabulary,
}

impl QuizDomain {
    pub const ALL: [QuizDomain; 2] = [QuizDomain::Terms, QuizDomain::Vocabulary];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuizDomain::Terms => "terms",
            QuizDomain::Vocabulary => "vocabulary",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            QuizDomain::Terms => "IT Term Quiz",
            QuizDomain::Vocabulary => "English Vocabulary Quiz",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            QuizDomain::Terms => "Which meaning matches this term?",
            QuizDomain::Vocabulary => "What does this word mean?",
        }
    }

    /// Name under which scores for this quiz are stored.
    pub fn quiz_name(&self) -> &'static str {
        self.as_str()
    }

    pub fn categories(&self) -> &'static [CategoryInfo] {
        match self {
            QuizDomain::Terms => &TERMS_CATEGORIES,
            QuizDomain::Vocabulary => &VOCABULARY_CATEGORIES,
        }
    }
}

impl std::fmt::Display for QuizDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuizDomain {
    type Err = crate::error::QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terms" => Ok(QuizDomain::Terms),
            "vocabulary" => Ok(QuizDomain::Vocabulary),
            _ => Err(crate::error::QuizError::UnknownQuiz(s.to_string())),
        }
    }
}
