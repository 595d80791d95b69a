//! Chat session domain model.

use super::message::Message;
use crate::user::User;
use serde::{Deserialize, Serialize};

/// A direct-message conversation with one counterpart.
///
/// `last_message` always mirrors the text of the newest message after an append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    /// The other participant
    pub user: User,
    pub last_message: String,
    pub unread_count: u32,
    /// Messages in append (chronological) order
    pub messages: Vec<Message>,
}

impl ChatSession {
    /// Appends a message and refreshes the summary.
    pub fn append(&mut self, message: Message) {
        self.last_message = message.text.clone();
        self.messages.push(message);
    }

    pub fn mark_read(&mut self) {
        self.unread_count = 0;
    }

    /// Text shown in the session list: the newest message, or the stored summary.
    pub fn preview(&self) -> &str {
        self.messages
            .last()
            .map(|m| m.text.as_str())
            .unwrap_or(&self.last_message)
    }

    /// Whether the counterpart is the account with the given username.
    pub fn is_with(&self, username: &str) -> bool {
        self.user.username == username
    }
}
