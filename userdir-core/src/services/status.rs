//! Status service - directory and session summary

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::adapters::duckdb::DuckDbDirectoryStore;
use crate::config::{Config, DataSource};
use crate::services::SessionService;

/// Status service for the local directory and session
pub struct StatusService {
    store: Arc<DuckDbDirectoryStore>,
    sessions: Arc<SessionService>,
}

impl StatusService {
    pub fn new(store: Arc<DuckDbDirectoryStore>, sessions: Arc<SessionService>) -> Self {
        Self { store, sessions }
    }

    /// Summarize the local store, the configured source and the session
    pub fn get_status(&self, config: &Config) -> Result<StatusSummary> {
        let session = self.sessions.current()?;

        let source = match config.data_source() {
            DataSource::Local => SourceSummary {
                kind: "local".to_string(),
                location: self.store.db_path().display().to_string(),
            },
            DataSource::Remote(url) => SourceSummary {
                kind: "remote".to_string(),
                location: url,
            },
        };

        Ok(StatusSummary {
            total_users: self.store.count_users()?,
            total_friend_links: self.store.count_friend_links()?,
            dangling_friend_ids: self.store.find_dangling_friend_ids()?,
            source,
            demo_mode: config.is_demo_mode(),
            signed_in: session.is_some(),
            session_fingerprint: session.as_ref().map(|s| s.fingerprint()),
            session_created_at: session.map(|s| s.created_at.to_rfc3339()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_users: i64,
    pub total_friend_links: i64,
    pub dangling_friend_ids: Vec<String>,
    pub source: SourceSummary,
    pub demo_mode: bool,
    pub signed_in: bool,
    pub session_fingerprint: Option<String>,
    pub session_created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SourceSummary {
    pub kind: String,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::session_file::FileSessionStore;
    use crate::domain::User;
    use tempfile::tempdir;

    #[test]
    fn test_status_counts_and_session() {
        let dir = tempdir().unwrap();
        let store = Arc::new(DuckDbDirectoryStore::in_memory().unwrap());
        store.ensure_schema().unwrap();
        store
            .upsert_user(&User::new("1", 1, "One", "1@example.com").with_friends(["2", "3"]))
            .unwrap();
        store.upsert_user(&User::new("2", 2, "Two", "2@example.com")).unwrap();

        let sessions = Arc::new(SessionService::new(Arc::new(FileSessionStore::new(dir.path()))));
        let service = StatusService::new(Arc::clone(&store), Arc::clone(&sessions));

        let status = service.get_status(&Config::default()).unwrap();
        assert_eq!(status.total_users, 2);
        assert_eq!(status.total_friend_links, 2);
        assert_eq!(status.dangling_friend_ids, vec!["3"]);
        assert_eq!(status.source.kind, "local");
        assert!(!status.signed_in);

        let token = sessions.sign_up().unwrap();
        let status = service.get_status(&Config::default()).unwrap();
        assert!(status.signed_in);
        assert_eq!(status.session_fingerprint, Some(token.fingerprint()));
    }
}
