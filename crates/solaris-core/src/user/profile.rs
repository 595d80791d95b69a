//! Profile records returned by the backend.
//!
//! Every column is optional on the wire. Mapping onto [`User`] substitutes the
//! documented defaults so that no empty value propagates into the snapshot.

use super::model::User;
use serde::{Deserialize, Serialize};

pub const DEFAULT_USERNAME: &str = "user";
pub const DEFAULT_DISPLAY_NAME: &str = "User";
pub const DEFAULT_AVATAR_URL: &str = "https://picsum.photos/200/200";
pub const DEFAULT_BIO: &str = "";

/// A row of the `profiles` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub is_verified: Option<bool>,
}

impl ProfileRecord {
    /// Maps the record onto the signed-in user.
    ///
    /// The backend keeps no counters, so `posts`, `followers` and `following` are zero.
    pub fn into_user(self, user_id: &str) -> User {
        User {
            id: user_id.to_string(),
            username: or_default(self.username, DEFAULT_USERNAME),
            name: or_default(self.full_name, DEFAULT_DISPLAY_NAME),
            avatar: or_default(self.avatar_url, DEFAULT_AVATAR_URL),
            bio: or_default(self.bio, DEFAULT_BIO),
            posts: 0,
            followers: 0,
            following: 0,
            is_verified: self.is_verified.unwrap_or(false),
        }
    }
}

/// Empty strings count as absent.
pub(crate) fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
