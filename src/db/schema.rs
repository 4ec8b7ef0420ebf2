use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS scores (
      user_id TEXT NOT NULL,
      quiz_name TEXT NOT NULL,
      correct INTEGER NOT NULL DEFAULT 0,
      total INTEGER NOT NULL DEFAULT 0,
      created_at TEXT NOT NULL,
      updated_at TEXT NOT NULL,
      PRIMARY KEY (user_id, quiz_name),
      CHECK (correct >= 0 AND correct <= total)
    );

    CREATE INDEX IF NOT EXISTS idx_scores_user ON scores(user_id);
    "#,
  )?;

  Ok(())
}
