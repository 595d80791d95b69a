//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: User domain model
//! - `profile`: Profile record as stored by the backend, and its mapping onto `User`

mod model;
mod profile;

// Re-export public API
pub use model::User;
pub use profile::{
    DEFAULT_AVATAR_URL, DEFAULT_BIO, DEFAULT_DISPLAY_NAME, DEFAULT_USERNAME, ProfileRecord,
};
pub(crate) use profile::or_default;
