//! Remote data gateway trait.

use super::auth_listener::{AuthListener, AuthSubscription};
use crate::error::{AuthError, DataFetchError};
use crate::post::PostRecord;
use crate::user::ProfileRecord;
use async_trait::async_trait;
use std::fmt;

/// An authenticated session issued by the backend. Opaque to the coordinator
/// apart from the user id.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: String,
    pub email: Option<String>,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

// Tokens stay out of logs.
impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Facade over the hosted auth/database backend.
///
/// Every call may fail because the backend is unreachable or refuses the request.
/// Callers treat data failures as non-fatal.
#[async_trait]
pub trait RemoteDataGateway: Send + Sync {
    /// Returns the current session, if any. No side effects.
    async fn get_session(&self) -> Option<AuthSession>;

    /// Fetches the profile row of the given user. `Ok(None)` when no row exists.
    async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRecord>, DataFetchError>;

    /// Lists posts joined with their owner, newest first.
    async fn list_posts(&self) -> Result<Vec<PostRecord>, DataFetchError>;

    /// Registers a new account. Returns a session when the backend issues one
    /// immediately (no email confirmation step).
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Option<AuthSession>, AuthError>;

    /// Signs in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Registers a listener for session transitions.
    ///
    /// The returned handle must be released on teardown; dropping it also releases it.
    fn on_auth_state_change(&self, listener: AuthListener) -> AuthSubscription;
}
