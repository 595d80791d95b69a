//! Direct message domain module.
//!
//! # Module Structure
//!
//! - `message`: A single chat message
//! - `model`: Chat session with a counterpart user

mod message;
mod model;

// Re-export public API
pub use message::Message;
pub use model::ChatSession;
