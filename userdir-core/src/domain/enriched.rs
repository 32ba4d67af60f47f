//! Display-ready user view

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::User;

/// Placeholder shown for a friend id that matches no user
pub const UNKNOWN_FRIEND: &str = "Unknown";

/// A user together with the fields derived from the rest of the directory
///
/// Never persisted. Rebuilt whenever the underlying user set changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedUser {
    #[serde(flatten)]
    pub user: User,
    /// One entry per friend id, same order
    pub friend_names: Vec<String>,
    /// Empty when there is no resolvable best friend
    pub highest_ranking_friend_name: String,
}

impl Deref for EnrichedUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_flat_camel_case() {
        let enriched = EnrichedUser {
            user: User::new("1", 1, "John Doe", "john@example.com").with_friends(["2"]),
            friend_names: vec!["Jane Smith".to_string()],
            highest_ranking_friend_name: "Jane Smith".to_string(),
        };

        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["friendNames"][0], "Jane Smith");
        assert_eq!(value["highestRankingFriendName"], "Jane Smith");
        assert_eq!(enriched.name, "John Doe");
    }
}
