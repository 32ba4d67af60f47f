//! User domain model

use serde::{Deserialize, Serialize};

/// A directory entry as supplied by the store
///
/// Friend ids are kept in the order the store returned them. They are not
/// guaranteed to resolve to another user in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub rank: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub friends: Vec<String>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        rank: i64,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            rank,
            name: name.into(),
            email: email.into(),
            image: String::new(),
            friends: Vec::new(),
        }
    }

    /// Replace the friend list
    pub fn with_friends<I, S>(mut self, friends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.friends = friends.into_iter().map(Into::into).collect();
        self
    }

    /// Set the avatar image URL
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}
