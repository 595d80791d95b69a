//! Wire types for the backend auth endpoints.

use serde::{Deserialize, Serialize};
use solaris_core::gateway::AuthSession;

#[derive(Debug, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Response of `/token` (password and refresh grants).
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

impl TokenResponse {
    pub fn into_session(self) -> AuthSession {
        AuthSession {
            user_id: self.user.id,
            email: self.user.email,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
        }
    }
}

/// Response of `/signup`.
///
/// With email confirmation enabled the body is the bare user and carries no token.
#[derive(Debug, Deserialize)]
pub struct SignUpResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

impl SignUpResponse {
    pub fn into_session(self) -> Option<AuthSession> {
        let access_token = self.access_token?;
        let user = self.user?;
        Some(AuthSession {
            user_id: user.id,
            email: user.email,
            access_token,
            refresh_token: self.refresh_token,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SignUpRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: SignUpMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub struct SignUpMetadata<'a> {
    pub full_name: &'a str,
}

impl<'a> SignUpRequest<'a> {
    pub fn new(email: &'a str, password: &'a str, display_name: &'a str) -> Self {
        Self {
            email,
            password,
            data: SignUpMetadata {
                full_name: display_name,
            },
        }
    }
}

/// Session as written to `session.json` between runs.
///
/// No `Debug`: the tokens must not reach logs.
#[derive(Serialize, Deserialize)]
pub struct StoredSession {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl From<&AuthSession> for StoredSession {
    fn from(session: &AuthSession) -> Self {
        Self {
            user_id: session.user_id.clone(),
            email: session.email.clone(),
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
        }
    }
}

impl From<StoredSession> for AuthSession {
    fn from(stored: StoredSession) -> Self {
        Self {
            user_id: stored.user_id,
            email: stored.email,
            access_token: stored.access_token,
            refresh_token: stored.refresh_token,
        }
    }
}

/// Error payloads differ between auth server versions and the API gateway.
#[derive(Debug, Default, Deserialize)]
pub struct AuthErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AuthErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.msg
            .or(self.error_description)
            .or(self.message)
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}
