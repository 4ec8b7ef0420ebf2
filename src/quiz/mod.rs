//! The quiz engine: category filter, question generator, answer evaluator.

pub mod engine;
pub mod evaluator;
pub mod filter;
pub mod generator;

pub use engine::{GenerationTicket, QuizEngine, QuizView, RoundState};
pub use evaluator::{evaluate, Evaluation, Outcome, Round};
pub use filter::{filter_terms, CategorySelector, ALL_CATEGORIES};
pub use generator::{generate_choices, next_round, DEFAULT_CHOICE_COUNT};
