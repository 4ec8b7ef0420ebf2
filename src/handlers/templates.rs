//! Template structs for quiz pages.

use askama::Template;

use crate::content::QuizDomain;
use crate::domain::normalize_category;
use crate::quiz::{Outcome, QuizView};
use crate::services::SubmissionStatus;

/// One quiz on the index page.
pub struct QuizLink {
  pub slug: &'static str,
  pub title: &'static str,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
  pub quizzes: Vec<QuizLink>,
  pub signed_in: bool,
  /// Cumulative score across quizzes, for identified users
  pub cumulative_ratio: Option<String>,
  pub cumulative_percentage: u32,
}

pub struct CategoryOption {
  pub id: String,
  pub label: String,
  pub is_selected: bool,
}

pub struct ChoiceView {
  pub text: String,
  /// Highlighted once the round is answered
  pub is_answer: bool,
  /// The user's pick, when it was wrong
  pub is_wrong_pick: bool,
}

pub struct ResultView {
  pub is_correct: bool,
  pub correct_meaning: String,
}

#[derive(Template)]
#[template(path = "quiz.html")]
pub struct QuizTemplate {
  pub slug: &'static str,
  pub title: &'static str,
  pub prompt: &'static str,
  pub categories: Vec<CategoryOption>,
  pub term: Option<String>,
  pub answered: bool,
  pub choices: Vec<ChoiceView>,
  pub result: Option<ResultView>,
  pub empty_category: bool,
  pub ratio: String,
  pub percentage: u32,
  pub signed_in: bool,
  pub notice: Option<String>,
  pub submission_message: Option<String>,
  pub submission_failed: bool,
}

impl QuizTemplate {
  pub fn build(
    domain: QuizDomain,
    view: QuizView,
    submission: &SubmissionStatus,
    signed_in: bool,
    notice: Option<String>,
  ) -> Self {
    let selected = normalize_category(&view.selected_category);
    let categories = domain
      .categories()
      .iter()
      .map(|c| CategoryOption {
        id: c.id.to_string(),
        label: c.label.to_string(),
        is_selected: normalize_category(c.id) == selected,
      })
      .collect();

    let answered = view.evaluation.is_some();
    let choices = view
      .choices
      .iter()
      .map(|choice| {
        let (is_answer, is_wrong_pick) = match &view.evaluation {
          Some(eval) => (
            *choice == eval.correct_meaning,
            eval.outcome == Outcome::Wrong && *choice == eval.submitted,
          ),
          None => (false, false),
        };
        ChoiceView {
          text: choice.clone(),
          is_answer,
          is_wrong_pick,
        }
      })
      .collect();

    let result = view.evaluation.as_ref().map(|eval| ResultView {
      is_correct: eval.outcome.is_correct(),
      correct_meaning: eval.correct_meaning.clone(),
    });

    Self {
      slug: domain.as_str(),
      title: domain.title(),
      prompt: domain.prompt(),
      categories,
      term: view.term,
      answered,
      choices,
      result,
      empty_category: view.empty_category,
      ratio: view.ratio,
      percentage: view.percentage,
      signed_in,
      notice,
      submission_message: submission.message(),
      submission_failed: submission.is_failed(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::quiz::RoundState;

  fn view(selected: &str) -> QuizView {
    QuizView {
      selected_category: selected.to_string(),
      empty_category: false,
      state: RoundState::Unanswered,
      term: Some("TLS".to_string()),
      choices: vec!["encryption".to_string()],
      evaluation: None,
      correct: 0,
      total: 0,
      ratio: "0 / 0".to_string(),
      percentage: 0,
    }
  }

  fn selected_ids(selected: &str) -> Vec<String> {
    QuizTemplate::build(QuizDomain::Terms, view(selected), &SubmissionStatus::Idle, false, None)
      .categories
      .into_iter()
      .filter(|c| c.is_selected)
      .map(|c| c.id)
      .collect()
  }

  #[test]
  fn test_selected_category_matches_loosely() {
    assert_eq!(selected_ids("security"), vec!["security"]);
    assert_eq!(selected_ids(" Security "), vec!["security"]);
    assert_eq!(selected_ids("ＤＡＴＡＢＡＳＥ"), vec!["database"]);
    assert_eq!(selected_ids("All"), vec!["all"]);
  }

  #[test]
  fn test_unknown_category_selects_nothing() {
    assert!(selected_ids("networking").is_empty());
  }
}
