//! Error types for the Solaris client.
//!
//! Three failure families cross the gateway boundary and each one is recovered
//! differently by the coordinator:
//!
//! - [`AuthError`]: credential rejection or unreachable backend. Surfaced to the user.
//! - [`DataFetchError`]: profile/post retrieval failure. Logged, seed data kept.
//! - [`AssistantError`]: completion failure. Mapped to a fallback reply.
//!
//! [`SolarisError`] is the crate-wide error for coordinator operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of an authentication failure.
///
/// Demo mode is entered for [`AuthErrorKind::Unreachable`] and
/// [`AuthErrorKind::Misconfigured`]; a plain rejection only notifies the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorKind {
    /// The backend answered and refused the request (bad credentials, duplicate email,
    /// weak password).
    Rejected,
    /// The backend could not be reached (DNS, connect, timeout).
    Unreachable,
    /// The client credentials (project URL or publishable key) are missing or invalid.
    Misconfigured,
}

/// Authentication failure carrying a human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl AuthError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: AuthErrorKind::Rejected,
            message: message.into(),
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            kind: AuthErrorKind::Unreachable,
            message: message.into(),
        }
    }

    pub fn misconfigured(message: impl Into<String>) -> Self {
        Self {
            kind: AuthErrorKind::Misconfigured,
            message: message.into(),
        }
    }

    /// Whether this failure should switch the client into demo mode.
    pub fn enters_demo_mode(&self) -> bool {
        matches!(
            self.kind,
            AuthErrorKind::Unreachable | AuthErrorKind::Misconfigured
        )
    }
}

/// Failure while reading profile or post data from the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataFetchError {
    #[error("Backend request failed: {0}")]
    Transport(String),

    #[error("Backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    #[error("Backend call timed out")]
    Timeout,
}

/// Failure inside the assistant text gateway. Never leaves the gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("Assistant API key is not configured")]
    MissingCredential,

    #[error("Assistant request failed: {0}")]
    Transport(String),

    #[error("Assistant API returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse assistant response: {0}")]
    Decode(String),

    #[error("Assistant returned no text")]
    EmptyResponse,
}

/// A shared error type for coordinator operations.
#[derive(Error, Debug, Clone)]
pub enum SolarisError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Input rejected before reaching any gateway
    #[error("Validation error: {0}")]
    Validation(String),

    /// An earlier request on the same target has not resolved yet
    #[error("Busy: {0}")]
    Busy(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (configuration file access)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    DataFetch(#[from] DataFetchError),
}

impl SolarisError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn busy(message: impl Into<String>) -> Self {
        Self::Busy(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }
}

impl From<std::io::Error> for SolarisError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SolarisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SolarisError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, SolarisError>`.
pub type Result<T> = std::result::Result<T, SolarisError>;
