//! User domain model.

use serde::{Deserialize, Serialize};

/// A user account as shown in the feed, stories, profile and chats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier, stable for the lifetime of the account
    pub id: String,
    /// Handle shown with `@`
    pub username: String,
    /// Display name
    pub name: String,
    /// Avatar image URI
    pub avatar: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub posts: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub is_verified: bool,
}

impl User {
    /// Creates a user with zeroed counters and an empty bio.
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        name: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            name: name.into(),
            avatar: avatar.into(),
            bio: String::new(),
            posts: 0,
            followers: 0,
            following: 0,
            is_verified: false,
        }
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    pub fn with_counts(mut self, posts: u32, followers: u32, following: u32) -> Self {
        self.posts = posts;
        self.followers = followers;
        self.following = following;
        self
    }

    pub fn verified(mut self, is_verified: bool) -> Self {
        self.is_verified = is_verified;
        self
    }
}
