//! Domain layer for the Solaris client.
//!
//! Shared data shapes, the application snapshot with its single update entry point,
//! the gateway traits implemented by the infrastructure and interaction crates, and
//! the local seed dataset.

pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod post;
pub mod screen;
pub mod seed;
pub mod snapshot;
pub mod user;

// Re-export common types
pub use error::{AssistantError, AuthError, AuthErrorKind, DataFetchError, Result, SolarisError};
pub use screen::Screen;
pub use snapshot::{AppSnapshot, Notice, NoticeLevel, StateUpdate};
