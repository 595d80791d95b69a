//! Configuration service.
//!
//! Loads [`SolarisConfig`] from `config.toml` and applies environment overrides.
//! A missing file is not an error: the client then runs with defaults, which
//! leaves the backend unconfigured and puts sign-in into demo mode.

use crate::paths::SolarisPaths;
use solaris_core::config::SolarisConfig;
use solaris_core::{Result, SolarisError};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the default config location.
    pub fn new() -> Result<Self> {
        let path = SolarisPaths::new(None)
            .config_file()
            .map_err(|e| SolarisError::config(e.to_string()))?;
        Ok(Self { path })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file (if present) and applies process environment overrides.
    pub fn load(&self) -> Result<SolarisConfig> {
        let mut config = self.load_file()?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Reads the file only. Missing file yields the default configuration.
    pub fn load_file(&self) -> Result<SolarisConfig> {
        if !self.path.exists() {
            tracing::info!(
                "[Config] No configuration at {:?}, using defaults",
                self.path
            );
            return Ok(SolarisConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: SolarisConfig = toml::from_str(&content)?;
        tracing::debug!("[Config] Loaded configuration from {:?}", self.path);
        Ok(config)
    }
}
