//! Client configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; environment variables
//! override file values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const ENV_BACKEND_URL: &str = "SOLARIS_BACKEND_URL";
pub const ENV_PUBLISHABLE_KEY: &str = "SOLARIS_PUBLISHABLE_KEY";
pub const ENV_ASSISTANT_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_ASSISTANT_API_KEY_FALLBACK: &str = "API_KEY";
pub const ENV_ASSISTANT_MODEL: &str = "SOLARIS_ASSISTANT_MODEL";

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SolarisConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
}

/// Hosted backend project endpoint and publishable client key.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub publishable_key: Option<String>,
}

/// Generative-text API settings.
#[derive(Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct AssistantConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .finish()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Upper bound for every outbound call. Absent means calls may wait indefinitely.
    #[serde(default)]
    pub call_timeout_secs: Option<u64>,
}

impl CoordinatorConfig {
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_secs.map(Duration::from_secs)
    }
}

impl SolarisConfig {
    /// Overrides file values with environment values.
    ///
    /// `lookup` resolves a variable name; blank values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_BACKEND_URL) {
            self.backend.url = Some(url);
        }
        if let Some(key) = get(ENV_PUBLISHABLE_KEY) {
            self.backend.publishable_key = Some(key);
        }
        if let Some(key) = get(ENV_ASSISTANT_API_KEY).or_else(|| get(ENV_ASSISTANT_API_KEY_FALLBACK))
        {
            self.assistant.api_key = Some(key);
        }
        if let Some(model) = get(ENV_ASSISTANT_MODEL) {
            self.assistant.model_name = Some(model);
        }
    }
}
