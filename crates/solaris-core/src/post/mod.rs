//! Post domain module.
//!
//! # Module Structure
//!
//! - `model`: Feed post and comment models, like toggling
//! - `record`: Post rows from the backend joined with their owner profile

mod model;
mod record;

// Re-export public API
pub use model::{Comment, Post};
pub use record::{
    PostRecord, UNKNOWN_OWNER_AVATAR_URL, UNKNOWN_OWNER_ID, UNKNOWN_OWNER_NAME,
    UNKNOWN_OWNER_USERNAME,
};
