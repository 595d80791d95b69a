//! Path management for Solaris configuration files.
//!
//! ```text
//! ~/.config/solaris/
//! ├── config.toml      # Backend endpoint, assistant key, coordinator settings
//! └── session.json     # Last backend session, restored at startup
//! ```

use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves Solaris paths, optionally rooted at an explicit base directory.
#[derive(Debug, Clone, Default)]
pub struct SolarisPaths {
    base: Option<PathBuf>,
}

impl SolarisPaths {
    /// `None` uses the platform config directory (e.g. `~/.config/solaris`).
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join("solaris"))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.json"))
    }
}
