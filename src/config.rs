//! Application configuration.
//!
//! Values are resolved with priority: environment (including `.env`) >
//! `config.toml` > built-in defaults. The resolved [`Settings`] are passed
//! explicitly into the application state.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::quiz::DEFAULT_CHOICE_COUNT;

// ==================== Defaults ====================

/// Server address to bind to
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Score database location
pub const DEFAULT_DATABASE_PATH: &str = "data/word_trainer.db";

/// Pause before a new question appears, letting the previous one fade out
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 300;

/// Idle quiz sessions are dropped after this many hours
pub const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 12;

/// Longest accepted session expiry (one year)
pub const MAX_SESSION_EXPIRY_HOURS: i64 = 24 * 366;

/// Probability threshold for session cleanup (0-255, lower = more frequent).
/// 25 means ~10% chance (25/256) on each session access.
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

pub const CONFIG_FILE: &str = "config.toml";

// ==================== config.toml ====================

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    server: Option<ServerSection>,
    database: Option<DatabaseSection>,
    quiz: Option<QuizSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    bind_addr: Option<String>,
    session_expiry_hours: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct QuizSection {
    choice_count: Option<usize>,
    reveal_delay_ms: Option<u64>,
    terms_bank: Option<String>,
    vocabulary_bank: Option<String>,
}

// ==================== Settings ====================

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub database_path: PathBuf,
    /// Choices per question, correct answer included
    pub choice_count: usize,
    pub reveal_delay: Duration,
    pub session_expiry_hours: i64,
    /// Replacement bank files; `None` uses the built-in bank
    pub terms_bank: Option<PathBuf>,
    pub vocabulary_bank: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            choice_count: DEFAULT_CHOICE_COUNT,
            reveal_delay: Duration::from_millis(DEFAULT_REVEAL_DELAY_MS),
            session_expiry_hours: DEFAULT_SESSION_EXPIRY_HOURS,
            terms_bank: None,
            vocabulary_bank: None,
        }
    }
}

impl Settings {
    /// Load settings from `.env`, `config.toml` and the process environment.
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let contents = std::fs::read_to_string(CONFIG_FILE).ok();
        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve settings from optional `config.toml` contents and an
    /// environment lookup. Invalid values are logged and skipped.
    pub fn from_sources<F>(config_toml: Option<&str>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(contents) = config_toml {
            match toml::from_str::<ConfigFile>(contents) {
                Ok(file) => settings.apply_file(file),
                Err(e) => tracing::warn!("Ignoring invalid {}: {}", CONFIG_FILE, e),
            }
        }

        settings.apply_env(env);
        settings
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(server) = file.server {
            if let Some(addr) = server.bind_addr {
                self.bind_addr = addr;
            }
            if let Some(hours) = server.session_expiry_hours {
                self.session_expiry_hours = hours;
            }
        }
        if let Some(db) = file.database {
            if let Some(path) = db.path {
                tracing::info!("Using database from {}: {}", CONFIG_FILE, path);
                self.database_path = PathBuf::from(path);
            }
        }
        if let Some(quiz) = file.quiz {
            if let Some(count) = quiz.choice_count {
                self.choice_count = count;
            }
            if let Some(ms) = quiz.reveal_delay_ms {
                self.reveal_delay = Duration::from_millis(ms);
            }
            if let Some(path) = quiz.terms_bank {
                self.terms_bank = Some(PathBuf::from(path));
            }
            if let Some(path) = quiz.vocabulary_bank {
                self.vocabulary_bank = Some(PathBuf::from(path));
            }
        }
    }

    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = env("WT_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(path) = env("DATABASE_PATH") {
            tracing::info!("Using database from DATABASE_PATH env: {}", path);
            self.database_path = PathBuf::from(path);
        }
        if let Some(value) = env("WT_CHOICE_COUNT") {
            match value.parse() {
                Ok(count) => self.choice_count = count,
                Err(_) => tracing::warn!("Ignoring invalid WT_CHOICE_COUNT: {}", value),
            }
        }
        if let Some(value) = env("WT_REVEAL_DELAY_MS") {
            match value.parse() {
                Ok(ms) => self.reveal_delay = Duration::from_millis(ms),
                Err(_) => tracing::warn!("Ignoring invalid WT_REVEAL_DELAY_MS: {}", value),
            }
        }
        if let Some(path) = env("WT_TERMS_BANK") {
            self.terms_bank = Some(PathBuf::from(path));
        }
        if let Some(path) = env("WT_VOCABULARY_BANK") {
            self.vocabulary_bank = Some(PathBuf::from(path));
        }

        if self.choice_count == 0 {
            tracing::warn!("choice_count must be at least 1, using {}", DEFAULT_CHOICE_COUNT);
            self.choice_count = DEFAULT_CHOICE_COUNT;
        }
        if !(1..=MAX_SESSION_EXPIRY_HOURS).contains(&self.session_expiry_hours) {
            tracing::warn!(
                "session_expiry_hours must be between 1 and {}, using {}",
                MAX_SESSION_EXPIRY_HOURS,
                DEFAULT_SESSION_EXPIRY_HOURS
            );
            self.session_expiry_hours = DEFAULT_SESSION_EXPIRY_HOURS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_sources(None, |_| None);
        assert_eq!(settings.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(settings.choice_count, 4);
        assert_eq!(settings.reveal_delay, Duration::from_millis(300));
        assert!(settings.terms_bank.is_none());
    }

    #[test]
    fn test_config_file_values() {
        let toml = r#"
            [server]
            bind_addr = "127.0.0.1:8080"

            [database]
            path = "/tmp/scores.db"

            [quiz]
            choice_count = 3
            reveal_delay_ms = 0
            terms_bank = "banks/terms.json"
        "#;
        let settings = Settings::from_sources(Some(toml), |_| None);
        assert_eq!(settings.bind_addr, "127.0.0.1:8080");
        assert_eq!(settings.database_path, PathBuf::from("/tmp/scores.db"));
        assert_eq!(settings.choice_count, 3);
        assert_eq!(settings.reveal_delay, Duration::ZERO);
        assert_eq!(settings.terms_bank, Some(PathBuf::from("banks/terms.json")));
    }

    #[test]
    fn test_env_overrides_config_file() {
        let toml = "[database]\npath = \"from-file.db\"\n";
        let env = env_from(&[("DATABASE_PATH", "from-env.db"), ("WT_CHOICE_COUNT", "5")]);
        let settings = Settings::from_sources(Some(toml), env);
        assert_eq!(settings.database_path, PathBuf::from("from-env.db"));
        assert_eq!(settings.choice_count, 5);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let env = env_from(&[("WT_CHOICE_COUNT", "many"), ("WT_REVEAL_DELAY_MS", "-1")]);
        let settings = Settings::from_sources(Some("not = [valid"), env);
        assert_eq!(settings.choice_count, DEFAULT_CHOICE_COUNT);
        assert_eq!(settings.reveal_delay, Duration::from_millis(DEFAULT_REVEAL_DELAY_MS));
    }

    #[test]
    fn test_zero_choice_count_is_rejected() {
        let settings = Settings::from_sources(None, env_from(&[("WT_CHOICE_COUNT", "0")]));
        assert_eq!(settings.choice_count, DEFAULT_CHOICE_COUNT);
    }

    #[test]
    fn test_session_expiry_out_of_range_is_rejected() {
        for hours in ["0", "-3", "1000000000000"] {
            let toml = format!("[server]\nsession_expiry_hours = {}\n", hours);
            let settings = Settings::from_sources(Some(&toml), |_| None);
            assert_eq!(settings.session_expiry_hours, DEFAULT_SESSION_EXPIRY_HOURS);
        }

        let toml = "[server]\nsession_expiry_hours = 48\n";
        assert_eq!(Settings::from_sources(Some(toml), |_| None).session_expiry_hours, 48);
    }
}
