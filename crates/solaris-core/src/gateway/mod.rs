//! Gateway interfaces to the external services.
//!
//! # Module Structure
//!
//! - `remote`: Backend-as-a-service facade (session, profile, posts, credentials)
//! - `assistant`: Generative-text facade used by the assistant chat persona
//! - `auth_listener`: Auth-state change subscription handles

mod assistant;
mod auth_listener;
mod remote;

// Re-export public API
pub use assistant::AssistantGateway;
pub use auth_listener::{
    AuthEventKind, AuthListener, AuthListenerRegistry, AuthStateEvent, AuthSubscription,
};
pub use remote::{AuthSession, RemoteDataGateway};
