//! Application snapshot.
//!
//! The snapshot is the complete in-memory client state. It changes only through
//! [`AppSnapshot::apply`], one [`StateUpdate`] at a time, which keeps every mutation
//! auditable and lets each async resolution land atomically.

use crate::chat::{ChatSession, Message};
use crate::error::{Result, SolarisError};
use crate::post::Post;
use crate::screen::Screen;
use crate::seed;
use crate::user::User;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A blocking notification the view must show until dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// A single mutation of the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    /// Initial session lookup finished.
    BootstrapFinished,
    /// Unauthenticated -> Authenticated. `demo` marks a session-less fallback.
    Authenticated { demo: bool },
    /// Claims the one-time remote reconciliation.
    MarkReconciled,
    /// Replaces the current user with a fetched profile.
    ProfileLoaded(User),
    /// Replaces the feed. An empty listing is ignored.
    PostsLoaded(Vec<Post>),
    Navigate(Screen),
    ToggleLike { post_id: String },
    /// Opens a conversation and clears its unread counter.
    OpenSession { session_id: String },
    CloseSession,
    /// Appends a message; an outgoing message also clears the unread counter.
    AppendMessage {
        session_id: String,
        message: Message,
    },
    SetComposing { session_id: String, composing: bool },
    SetAuthInFlight(bool),
    ShowNotice(Notice),
    DismissNotice,
}

/// The complete client state at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSnapshot {
    pub authenticated: bool,
    /// Authenticated without a backend session
    pub demo_mode: bool,
    /// True until the startup session lookup has finished
    pub bootstrapping: bool,
    /// Whether the post-login reconciliation has been claimed
    pub reconciled: bool,
    pub current_user: User,
    pub posts: Vec<Post>,
    pub sessions: Vec<ChatSession>,
    pub screen: Screen,
    /// Conversation open inside the messages screen
    pub open_session: Option<String>,
    /// Sessions waiting on an assistant reply
    pub composing: BTreeSet<String>,
    pub notice: Option<Notice>,
    /// A credential submission is pending; further submits are refused
    pub auth_in_flight: bool,
}

impl Default for AppSnapshot {
    fn default() -> Self {
        Self::seeded()
    }
}

impl AppSnapshot {
    /// Creates the startup snapshot from the local seed dataset.
    pub fn seeded() -> Self {
        Self {
            authenticated: false,
            demo_mode: false,
            bootstrapping: true,
            reconciled: false,
            current_user: seed::current_user(),
            posts: seed::posts(),
            sessions: seed::chat_sessions(),
            screen: Screen::Feed,
            open_session: None,
            composing: BTreeSet::new(),
            notice: None,
            auth_in_flight: false,
        }
    }

    /// Applies one update. On error the snapshot is left unchanged.
    pub fn apply(&mut self, update: StateUpdate) -> Result<()> {
        match update {
            StateUpdate::BootstrapFinished => self.bootstrapping = false,
            StateUpdate::Authenticated { demo } => {
                // A real session clears an earlier demo fallback, never the reverse.
                self.demo_mode = if self.authenticated {
                    self.demo_mode && demo
                } else {
                    demo
                };
                self.authenticated = true;
            }
            StateUpdate::MarkReconciled => self.reconciled = true,
            StateUpdate::ProfileLoaded(user) => self.current_user = user,
            StateUpdate::PostsLoaded(posts) => {
                if posts.is_empty() {
                    tracing::debug!("[Snapshot] Empty post listing, keeping local feed");
                } else {
                    self.posts = posts;
                }
            }
            StateUpdate::Navigate(screen) => {
                self.screen = screen;
                if screen != Screen::Messages {
                    self.open_session = None;
                }
            }
            StateUpdate::ToggleLike { post_id } => {
                self.post_mut(&post_id)?.toggle_like();
            }
            StateUpdate::OpenSession { session_id } => {
                self.session_mut(&session_id)?.mark_read();
                self.open_session = Some(session_id);
                self.screen = Screen::Messages;
            }
            StateUpdate::CloseSession => self.open_session = None,
            StateUpdate::AppendMessage {
                session_id,
                message,
            } => {
                let session = self.session_mut(&session_id)?;
                if message.is_me {
                    session.mark_read();
                }
                session.append(message);
            }
            StateUpdate::SetComposing {
                session_id,
                composing,
            } => {
                if composing {
                    self.composing.insert(session_id);
                } else {
                    self.composing.remove(&session_id);
                }
            }
            StateUpdate::SetAuthInFlight(in_flight) => self.auth_in_flight = in_flight,
            StateUpdate::ShowNotice(notice) => self.notice = Some(notice),
            StateUpdate::DismissNotice => self.notice = None,
        }
        Ok(())
    }

    pub fn post(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    pub fn session(&self, session_id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    /// The conversation currently open in the messages screen.
    pub fn active_session(&self) -> Option<&ChatSession> {
        self.open_session
            .as_deref()
            .and_then(|id| self.session(id))
    }

    pub fn is_composing(&self, session_id: &str) -> bool {
        self.composing.contains(session_id)
    }

    /// Posts shown on the profile screen: authored by or liked by the current user.
    pub fn profile_posts(&self) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| p.user.id == self.current_user.id || p.liked_by_me)
            .collect()
    }

    fn post_mut(&mut self, post_id: &str) -> Result<&mut Post> {
        self.posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| SolarisError::not_found("post", post_id))
    }

    fn session_mut(&mut self, session_id: &str) -> Result<&mut ChatSession> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| SolarisError::not_found("chat session", session_id))
    }
}
