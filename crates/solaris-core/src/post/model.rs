//! Feed post domain model.

use crate::user::User;
use serde::{Deserialize, Serialize};

/// A comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub user: User,
    pub text: String,
    pub timestamp: String,
}

/// A post in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    /// Owning account
    pub user: User,
    /// Image URI (may be empty for remote rows without media)
    pub image: String,
    pub caption: String,
    pub likes: u32,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Whether the current viewer has liked this post
    pub liked_by_me: bool,
    /// Display label for the creation time ("2h", "18/10/2026")
    pub timestamp: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl Post {
    /// Flips `liked_by_me` and moves `likes` by one in the same direction.
    ///
    /// Returns the new `liked_by_me` value. Applying it twice restores the post.
    pub fn toggle_like(&mut self) -> bool {
        self.liked_by_me = !self.liked_by_me;
        if self.liked_by_me {
            self.likes = self.likes.saturating_add(1);
        } else {
            self.likes = self.likes.saturating_sub(1);
        }
        self.liked_by_me
    }
}
