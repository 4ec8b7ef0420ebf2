//! Application services.
//!
//! Logic shared by handlers that reaches beyond a single quiz engine.

pub mod submission;

pub use submission::{persist_score, submit_score, SubmissionStatus};
