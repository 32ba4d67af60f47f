//! Directory store port - read access to the user set

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::User;

/// Source of directory users
///
/// The directory asks for the whole user set once per load. Stores are not
/// expected to filter, sort or page; that all happens in memory.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Short name of the source (e.g., "duckdb", "http")
    fn name(&self) -> &str;

    /// Return every user in arrival order
    async fn list_users(&self) -> Result<Vec<User>>;
}

/// Fixed in-memory user set
///
/// Used for tests and for callers that already hold the users.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    users: Vec<User>,
}

impl StaticDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl DirectoryStore for StaticDirectory {
    fn name(&self) -> &str {
        "static"
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_directory_preserves_order() {
        let store = StaticDirectory::new(vec![
            User::new("2", 2, "Jane Smith", "jane@example.com"),
            User::new("1", 1, "John Doe", "john@example.com"),
        ]);

        let users = store.list_users().await.unwrap();
        let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }
}
