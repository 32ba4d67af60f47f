//! Directory service - loads the user set and derives the visible list
//!
//! Enrichment is computed once per loaded user set and shared by every
//! query and render against that snapshot.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::{EnrichedUser, Selection, User};
use crate::ports::DirectoryStore;
use crate::services::enrichment::enrich_all;
use crate::services::filter::matches;

/// Directory service for loading user snapshots
pub struct DirectoryService {
    store: Arc<dyn DirectoryStore>,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    /// Name of the backing store
    pub fn source(&self) -> &str {
        self.store.name()
    }

    /// Read every user from the store and build a snapshot
    ///
    /// Each call reads the store again; snapshots are never shared.
    pub async fn load(&self) -> Result<Directory> {
        let users = self
            .store
            .list_users()
            .await
            .with_context(|| format!("Failed to load users from {}", self.store.name()))?;
        Ok(Directory::new(users))
    }
}

/// An immutable user set with its enrichment
#[derive(Debug, Clone)]
pub struct Directory {
    users: Vec<User>,
    enriched: Vec<EnrichedUser>,
}

impl Directory {
    pub fn new(users: Vec<User>) -> Self {
        let enriched = enrich_all(&users);
        Self { users, enriched }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn enriched(&self) -> &[EnrichedUser] {
        &self.enriched
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Look up one enriched user by id (first match)
    pub fn get(&self, id: &str) -> Option<&EnrichedUser> {
        self.enriched.iter().find(|u| u.id == id)
    }

    /// Users matching `query`, in store order, with selection flags
    pub fn view(&self, query: &str, selection: &Selection) -> DirectoryView<'_> {
        let entries: Vec<ViewEntry<'_>> = self
            .enriched
            .iter()
            .filter(|enriched| matches(&enriched.user, query))
            .map(|enriched| ViewEntry {
                user: enriched,
                is_selected: selection.is_selected(&enriched.id),
            })
            .collect();

        DirectoryView {
            query: query.to_string(),
            total: self.users.len(),
            matched: entries.len(),
            selected: selection.selected().map(str::to_string),
            entries,
        }
    }
}

/// What the front-end renders for one query
#[derive(Debug, Serialize)]
pub struct DirectoryView<'a> {
    pub query: String,
    pub total: usize,
    pub matched: usize,
    pub selected: Option<String>,
    pub entries: Vec<ViewEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewEntry<'a> {
    #[serde(flatten)]
    pub user: &'a EnrichedUser,
    pub is_selected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::StaticDirectory;

    fn sample_users() -> Vec<User> {
        vec![
            User::new("1", 1, "John Doe", "john@example.com").with_friends(["2", "3"]),
            User::new("2", 2, "Jane Smith", "jane@example.com").with_friends(["1"]),
            User::new("3", 3, "Alex Johnson", "alex@example.com"),
        ]
    }

    #[tokio::test]
    async fn test_load_builds_enriched_snapshot() {
        let service = DirectoryService::new(Arc::new(StaticDirectory::new(sample_users())));
        let directory = service.load().await.unwrap();

        assert_eq!(directory.len(), 3);
        let john = directory.get("1").unwrap();
        assert_eq!(john.friend_names, vec!["Jane Smith", "Alex Johnson"]);
        assert_eq!(john.highest_ranking_friend_name, "Alex Johnson");
        assert_eq!(service.source(), "static");
    }

    #[test]
    fn test_view_filters_and_flags_selection() {
        let directory = Directory::new(sample_users());
        let mut selection = Selection::new();
        selection.toggle("2");

        let view = directory.view("jane", &selection);
        assert_eq!(view.total, 3);
        assert_eq!(view.matched, 1);
        assert_eq!(view.entries[0].user.id, "2");
        assert!(view.entries[0].is_selected);
        assert_eq!(view.selected.as_deref(), Some("2"));
    }

    #[test]
    fn test_view_by_friend_id_keeps_order() {
        let directory = Directory::new(sample_users());
        let view = directory.view("2", &Selection::new());

        let ids: Vec<&str> = view.entries.iter().map(|e| e.user.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(view.entries.iter().all(|e| !e.is_selected));
    }

    #[test]
    fn test_empty_directory_view() {
        let directory = Directory::new(Vec::new());
        let view = directory.view("", &Selection::new());

        assert!(directory.is_empty());
        assert_eq!(view.matched, 0);
        assert!(view.entries.is_empty());
    }

    #[test]
    fn test_view_serializes_entries_flat() {
        let directory = Directory::new(sample_users());
        let view = directory.view("john", &Selection::new());

        let json = serde_json::to_value(&view).unwrap();
        let first = &json["entries"][0];
        assert_eq!(first["name"], "John Doe");
        assert_eq!(first["isSelected"], false);
        assert_eq!(first["highestRankingFriendName"], "Alex Johnson");
    }
}
