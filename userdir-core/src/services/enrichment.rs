//! Friend enrichment - resolves friend names and the highest-ranked friend
//!
//! Lookups follow left-to-right search semantics: when the same id appears
//! twice in the user set, the first record wins.

use std::collections::HashMap;

use crate::domain::{EnrichedUser, User, UNKNOWN_FRIEND};

/// Enrich a single user against the full user set
///
/// `all_users` does not need to contain `user` itself. Dangling friend ids
/// show up as "Unknown" and never win the ranking.
pub fn enrich(user: &User, all_users: &[User]) -> EnrichedUser {
    let lookup = |id: &str| all_users.iter().find(|u| u.id == id);
    enrich_with(user, lookup)
}

/// Enrich every user in the set, in order
///
/// Builds one id index for the whole set. The result is identical to calling
/// [`enrich`] for each user.
pub fn enrich_all(all_users: &[User]) -> Vec<EnrichedUser> {
    let mut index: HashMap<&str, &User> = HashMap::with_capacity(all_users.len());
    for user in all_users {
        index.entry(user.id.as_str()).or_insert(user);
    }

    all_users
        .iter()
        .map(|user| enrich_with(user, |id| index.get(id).copied()))
        .collect()
}

fn enrich_with<'a, F>(user: &User, lookup: F) -> EnrichedUser
where
    F: Fn(&str) -> Option<&'a User>,
{
    let friend_names = user
        .friends
        .iter()
        .map(|id| {
            lookup(id)
                .map(|friend| friend.name.clone())
                .unwrap_or_else(|| UNKNOWN_FRIEND.to_string())
        })
        .collect();

    EnrichedUser {
        user: user.clone(),
        friend_names,
        highest_ranking_friend_name: highest_ranking_friend_name(&user.friends, &lookup),
    }
}

/// Name of the friend with the strictly greatest rank, first one on ties
///
/// The candidate starts at the first friend id. A candidate that does not
/// resolve is never replaced, so the result is then empty.
fn highest_ranking_friend_name<'a, F>(friends: &[String], lookup: &F) -> String
where
    F: Fn(&str) -> Option<&'a User>,
{
    let Some(first) = friends.first() else {
        return String::new();
    };

    let mut candidate = first.as_str();
    for id in friends {
        let Some(friend) = lookup(id) else {
            continue;
        };
        let Some(best) = lookup(candidate) else {
            continue;
        };
        if friend.rank > best.rank {
            candidate = id.as_str();
        }
    }

    lookup(candidate)
        .map(|friend| friend.name.clone())
        .unwrap_or_default()
}
