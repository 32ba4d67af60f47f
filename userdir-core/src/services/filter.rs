//! Free-text directory filter
//!
//! A user matches when the lowercased query is a substring of
//! `"{id} {name} {friend ids...}"`, lowercased.

use crate::domain::User;

/// The lowercase text a query is matched against
pub fn search_text(user: &User) -> String {
    format!("{} {} {}", user.id, user.name, user.friends.join(" ")).to_lowercase()
}

/// Check a single user against a query
pub fn matches(user: &User, query: &str) -> bool {
    search_text(user).contains(&query.to_lowercase())
}

/// Keep the users matching `query`, in their original order
///
/// An empty query keeps everyone.
pub fn filter<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    let query = query.to_lowercase();
    users
        .iter()
        .filter(|user| search_text(user).contains(&query))
        .collect()
}
