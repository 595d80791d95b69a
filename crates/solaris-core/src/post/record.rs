//! Post rows returned by the backend listing.

use super::model::Post;
use crate::user::or_default;
use crate::user::{ProfileRecord, User};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_OWNER_ID: &str = "unknown";
pub const UNKNOWN_OWNER_USERNAME: &str = "unknown";
pub const UNKNOWN_OWNER_NAME: &str = "Unknown";
pub const UNKNOWN_OWNER_AVATAR_URL: &str = "https://picsum.photos/200";

/// A row of the `posts` table with its owner joined as `user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Text or numeric primary key, kept as text
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    #[serde(default)]
    pub user: Option<ProfileRecord>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub likes_count: Option<u32>,
    /// Raw creation time; formatted leniently by [`PostRecord::into_post`]
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl PostRecord {
    /// Maps the row onto a feed post. The viewer's like state is not stored remotely.
    pub fn into_post(self) -> Post {
        let owner = self.user.unwrap_or_default();
        let user = User {
            id: or_default(owner.id, UNKNOWN_OWNER_ID),
            username: or_default(owner.username, UNKNOWN_OWNER_USERNAME),
            name: or_default(owner.full_name, UNKNOWN_OWNER_NAME),
            avatar: or_default(owner.avatar_url, UNKNOWN_OWNER_AVATAR_URL),
            bio: owner.bio.unwrap_or_default(),
            posts: 0,
            followers: 0,
            following: 0,
            is_verified: owner.is_verified.unwrap_or(false),
        };

        Post {
            id: self.id,
            user,
            image: self.image_url.unwrap_or_default(),
            caption: self.caption.unwrap_or_default(),
            likes: self.likes_count.unwrap_or(0),
            comments: Vec::new(),
            liked_by_me: false,
            timestamp: self
                .created_at
                .as_deref()
                .and_then(date_label)
                .unwrap_or_default(),
            location: self.location,
        }
    }
}

/// Formats a creation time as `%d/%m/%Y`.
///
/// Accepts RFC 3339, timestamps without an offset (`timestamp` columns) and bare
/// dates. Anything else yields `None`.
fn date_label(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|at| at.date_naive())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|at| at.date())
        })
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|at| at.date())
        })
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%d/%m/%Y").to_string())
}

fn id_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(de::Error::custom(format!("unsupported post id: {other}"))),
    }
}
