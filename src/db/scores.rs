//! Per-user score records, one row per (user, quiz).

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::Score;

/// A stored score row.
#[derive(Debug, Clone)]
pub struct StoredScore {
    pub quiz_name: String,
    pub score: Score,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Insert or overwrite the score for `(user_id, quiz_name)`.
///
/// The row always holds the latest reported tally, so repeating a submission
/// with the same values leaves the table unchanged apart from `updated_at`.
pub fn upsert_score(conn: &Connection, user_id: &str, quiz_name: &str, score: Score) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        r#"
        INSERT INTO scores (user_id, quiz_name, correct, total, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        ON CONFLICT(user_id, quiz_name) DO UPDATE SET
            correct = excluded.correct,
            total = excluded.total,
            updated_at = excluded.updated_at
        "#,
        params![user_id, quiz_name, score.correct(), score.total(), now],
    )?;
    Ok(())
}

pub fn get_score(conn: &Connection, user_id: &str, quiz_name: &str) -> Result<Option<Score>> {
    conn.query_row(
        "SELECT correct, total FROM scores WHERE user_id = ?1 AND quiz_name = ?2",
        params![user_id, quiz_name],
        |row| Ok(row_score(row.get(0)?, row.get(1)?)),
    )
    .optional()
}

/// All stored scores for a user, ordered by quiz name.
pub fn get_user_scores(conn: &Connection, user_id: &str) -> Result<Vec<StoredScore>> {
    let mut stmt = conn.prepare(
        "SELECT quiz_name, correct, total, updated_at FROM scores WHERE user_id = ?1 ORDER BY quiz_name",
    )?;
    let rows = stmt.query_map([user_id], |row| {
        let updated_at: String = row.get(3)?;
        Ok(StoredScore {
            quiz_name: row.get(0)?,
            score: row_score(row.get(1)?, row.get(2)?),
            updated_at: DateTime::parse_from_rfc3339(&updated_at)
                .map(|dt| dt.with_timezone(&Utc))
                .ok(),
        })
    })?;
    rows.collect()
}

/// Sum of every stored score for a user across all quizzes.
pub fn get_cumulative_score(conn: &Connection, user_id: &str) -> Result<Score> {
    Ok(get_user_scores(conn, user_id)?
        .into_iter()
        .map(|s| s.score)
        .sum())
}

fn row_score(correct: u32, total: u32) -> Score {
    Score::from_parts(correct, total).unwrap_or_else(|| {
        tracing::warn!("Stored score {}/{} exceeds its total, clamping", correct, total);
        Score::from_parts(total, total).unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestEnv;

    fn score(correct: u32, total: u32) -> Score {
        Score::from_parts(correct, total).unwrap()
    }

    #[test]
    fn test_get_missing_score() {
        let env = TestEnv::new().unwrap();
        assert_eq!(get_score(&env.conn, "u1", "terms").unwrap(), None);
    }

    #[test]
    fn test_upsert_inserts_then_updates() {
        let env = TestEnv::new().unwrap();
        upsert_score(&env.conn, "u1", "terms", score(1, 2)).unwrap();
        assert_eq!(get_score(&env.conn, "u1", "terms").unwrap(), Some(score(1, 2)));

        upsert_score(&env.conn, "u1", "terms", score(3, 5)).unwrap();
        assert_eq!(get_score(&env.conn, "u1", "terms").unwrap(), Some(score(3, 5)));

        let rows: i64 = env
            .conn
            .query_row("SELECT COUNT(*) FROM scores", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_repeated_submission_is_idempotent() {
        let env = TestEnv::new().unwrap();
        for _ in 0..3 {
            upsert_score(&env.conn, "u1", "vocabulary", score(2, 4)).unwrap();
        }
        assert_eq!(
            get_cumulative_score(&env.conn, "u1").unwrap(),
            score(2, 4)
        );
    }

    #[test]
    fn test_scores_are_keyed_per_user_and_quiz() {
        let env = TestEnv::new().unwrap();
        upsert_score(&env.conn, "u1", "terms", score(1, 1)).unwrap();
        upsert_score(&env.conn, "u1", "vocabulary", score(2, 3)).unwrap();
        upsert_score(&env.conn, "u2", "terms", score(0, 4)).unwrap();

        let scores = get_user_scores(&env.conn, "u1").unwrap();
        let names: Vec<&str> = scores.iter().map(|s| s.quiz_name.as_str()).collect();
        assert_eq!(names, vec!["terms", "vocabulary"]);
        assert!(scores.iter().all(|s| s.updated_at.is_some()));

        assert_eq!(get_cumulative_score(&env.conn, "u1").unwrap(), score(3, 4));
        assert_eq!(get_cumulative_score(&env.conn, "u2").unwrap(), score(0, 4));
        assert_eq!(get_cumulative_score(&env.conn, "nobody").unwrap(), Score::default());
    }
}
