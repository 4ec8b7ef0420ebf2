pub mod schema;
pub mod scores;

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub use schema::run_migrations;
pub use scores::*;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        self.map_err(|e| tracing::warn!("{}: {}", context, e)).ok()
    }
}

/// The score store mutex was poisoned by a panicking writer.
#[derive(Debug, thiserror::Error)]
#[error("Score store unavailable")]
pub struct DbLockError;

/// Lock the score store, reporting a poisoned mutex instead of panicking.
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
    pool.lock().map_err(|_| {
        tracing::error!("Score store mutex poisoned; a writer panicked while holding it");
        DbLockError
    })
}

/// Open (creating if needed) the score database and bring its schema up to date.
pub fn init_db(path: &Path) -> Result<DbPool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let conn = Connection::open(path)?;
    run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// In-memory database with the full schema, for tests and throwaway runs.
pub fn init_memory_db() -> Result<DbPool> {
    let conn = Connection::open_in_memory()?;
    run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_warn() {
        let ok: std::result::Result<i32, String> = Ok(3);
        assert_eq!(ok.log_warn("ctx"), Some(3));
        let err: std::result::Result<i32, String> = Err("boom".to_string());
        assert_eq!(err.log_warn("ctx"), None);
    }

    #[test]
    fn test_init_db_creates_parent_dirs() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/scores.db");
        let pool = init_db(&path).unwrap();
        assert!(path.exists());
        assert!(try_lock(&pool).is_ok());
    }

    #[test]
    fn test_poisoned_store_reports_unavailable() {
        let pool = init_memory_db().unwrap();
        let poisoner = Arc::clone(&pool);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("writer failed");
        })
        .join();

        let err = try_lock(&pool).err().unwrap();
        assert_eq!(err.to_string(), "Score store unavailable");
    }
}
