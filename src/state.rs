//! Application state passed to all handlers.

use std::sync::Arc;

use crate::config::Settings;
use crate::content::QuestionBanks;
use crate::db::DbPool;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    /// Score store shared by all sessions
    pub db: DbPool,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(settings: Settings, db: DbPool, banks: QuestionBanks) -> Self {
        let sessions = SessionStore::new(banks, settings.choice_count, settings.session_expiry_hours);
        Self {
            settings: Arc::new(settings),
            db,
            sessions: Arc::new(sessions),
        }
    }
}
