//! Error type shared by the quiz engine and the score submission path.
//!
//! None of these are fatal: each maps to a recoverable UI state.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The selected category matches no terms.
    #[error("No items in the selected category")]
    EmptyActiveSet,

    /// The live round was already answered; the attempt is ignored.
    #[error("This question has already been answered")]
    DuplicateAnswer,

    /// An answer arrived while no round is live.
    #[error("No question is currently being asked")]
    NoRound,

    /// Score submission without an identified user.
    #[error("Sign in to save your score")]
    AnonymousSubmission,

    /// The score store rejected or failed the write.
    #[error("Failed to save score: {0}")]
    PersistenceFailure(String),

    #[error("Unknown quiz: {0}")]
    UnknownQuiz(String),
}
