//! Chat message type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single message in a chat session. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier within the session (UUID format)
    pub id: String,
    /// Account id of the author
    pub sender_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Whether the current user wrote this message
    pub is_me: bool,
}

impl Message {
    /// Creates a message authored by the current user.
    pub fn outgoing(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(sender_id, text, true)
    }

    /// Creates a message authored by the session counterpart.
    pub fn incoming(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(sender_id, text, false)
    }

    fn new(sender_id: impl Into<String>, text: impl Into<String>, is_me: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id: sender_id.into(),
            text: text.into(),
            timestamp: Utc::now(),
            is_me,
        }
    }
}
