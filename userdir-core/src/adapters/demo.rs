//! Demo directory data
//!
//! Seven sample users with ranks 1-7. The first four know each other; the
//! rest have no friends yet.

use crate::domain::User;

const DEMO_IMAGE: &str = "https://picsum.photos/200";

/// Generate the demo user set
pub fn generate_demo_users() -> Vec<User> {
    let user = |id: &str, rank: i64, name: &str, email: &str, friends: &[&str]| {
        User::new(id, rank, name, email)
            .with_image(DEMO_IMAGE)
            .with_friends(friends.iter().copied())
    };

    vec![
        user("1", 1, "John Doe", "john.doe@example.com", &["2", "3", "4"]),
        user("2", 2, "Jane Smith", "jane.smith@example.com", &["1", "3"]),
        user("3", 3, "Alex Johnson", "alex.johnson@example.com", &["1", "2"]),
        user("4", 4, "Sarah Williams", "sarah.williams@example.com", &["1"]),
        user("5", 5, "Michael Brown", "michael.brown@example.com", &[]),
        user("6", 6, "Emily Davis", "emily.davis@example.com", &[]),
        user("7", 7, "Christopher Wilson", "christopher.wilson@example.com", &[]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::enrichment::enrich_all;

    #[test]
    fn test_demo_users_have_unique_ids() {
        let users = generate_demo_users();
        let mut ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), users.len());
    }

    #[test]
    fn test_demo_friend_rankings() {
        let enriched = enrich_all(&generate_demo_users());

        assert_eq!(
            enriched[0].friend_names,
            vec!["Jane Smith", "Alex Johnson", "Sarah Williams"]
        );
        assert_eq!(enriched[0].highest_ranking_friend_name, "Sarah Williams");
        assert_eq!(enriched[1].highest_ranking_friend_name, "Alex Johnson");
        assert_eq!(enriched[3].highest_ranking_friend_name, "John Doe");
        assert_eq!(enriched[6].highest_ranking_friend_name, "");
    }
}
