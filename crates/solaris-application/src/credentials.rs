//! Credential submission input.

use solaris_core::{Result, SolarisError};
use std::fmt;

pub const MISSING_FIELDS_NOTICE: &str = "Please fill in all fields.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

/// Values entered on the auth screen.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    /// Display name, only used on sign-up
    pub display_name: String,
}

impl Credentials {
    pub fn sign_in(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mode: AuthMode::SignIn,
            email: email.into(),
            password: password.into(),
            display_name: String::new(),
        }
    }

    pub fn sign_up(
        email: impl Into<String>,
        password: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            mode: AuthMode::SignUp,
            email: email.into(),
            password: password.into(),
            display_name: display_name.into(),
        }
    }

    /// Rejects blank fields before any backend call.
    pub fn validate(&self) -> Result<()> {
        let name_missing = self.mode == AuthMode::SignUp && self.display_name.trim().is_empty();
        if self.email.trim().is_empty() || self.password.is_empty() || name_missing {
            return Err(SolarisError::validation(MISSING_FIELDS_NOTICE));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("mode", &self.mode)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}
