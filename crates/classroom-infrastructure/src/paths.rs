//! Unified path management for classroom client files.
//!
//! All configuration, credentials and logs live under one platform-specific
//! directory resolved through the `dirs` crate.

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "classroom";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
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

/// Unified path management.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/classroom/          # Config directory (platform default)
/// ├── config.toml               # Client configuration
/// ├── credential.toml           # Persisted bearer credential (0600)
/// └── logs/                     # Application logs
///     └── classroom.log.YYYY-MM-DD
/// ```
///
/// A base directory can be injected (tests, portable installs); otherwise the
/// platform config directory is used.
#[derive(Debug, Clone, Default)]
pub struct ClassroomPaths {
    base: Option<PathBuf>,
}

impl ClassroomPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the classroom configuration directory.
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/classroom/`
    /// - `Err(PathError::ConfigDirNotFound)`: platform directory unknown
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path of the persisted credential.
    ///
    /// # Security Note
    ///
    /// The file is written with permissions 600 on Unix.
    pub fn credential_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("credential.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
