//! Test utilities for database setup.
//!
//! Reuses the authoritative schema initialization so tests never carry their
//! own copy of the schema.

use rusqlite::Connection;
use tempfile::TempDir;

/// Score database in a temporary directory, removed when dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// Connection with the full schema applied
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let db_path = temp.path().join("scores.db");
        let conn = Connection::open(&db_path)?;
        crate::db::schema::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }
}
