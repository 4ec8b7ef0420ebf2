pub mod score;
pub mod term;

pub use score::Score;
pub use term::{normalize_category, Term};
