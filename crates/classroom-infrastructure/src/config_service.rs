//! Configuration service implementation.
//!
//! Loads `config.toml`, writes the defaults on first run, and applies
//! environment overrides.
//!
//! Configuration priority: environment variables > config.toml > defaults

use crate::paths::ClassroomPaths;
use crate::storage::AtomicTomlFile;
use classroom_core::config::ClientConfig;
use classroom_core::error::{ClassroomError, Result};
use std::path::PathBuf;

pub const ENV_API_BASE: &str = "CLASSROOM_API_BASE";
pub const ENV_API_KEY: &str = "CLASSROOM_API_KEY";
pub const ENV_LOG: &str = "CLASSROOM_LOG";

/// Service for loading the client configuration.
pub struct ConfigService {
    file: AtomicTomlFile<ClientConfig>,
}

impl ConfigService {
    pub fn new(paths: &ClassroomPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| ClassroomError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading from a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    /// Loads the configuration file, creating it with defaults when missing.
    ///
    /// Environment overrides are not applied here; see [`ConfigService::load`].
    pub fn load_file(&self) -> Result<ClientConfig> {
        match self.file.load()? {
            Some(config) => Ok(config),
            None => {
                let config = ClientConfig::default();
                self.file.save(&config)?;
                tracing::info!(
                    "[Config] Wrote default configuration to {:?}",
                    self.file.path()
                );
                Ok(config)
            }
        }
    }

    /// Loads the configuration and applies process environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        let config = self.load_file()?;
        let config = apply_overrides(config, |key| std::env::var(key).ok());
        validate(&config)?;
        Ok(config)
    }
}

/// Applies overrides looked up through `lookup`; blank values are ignored.
pub fn apply_overrides<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(base_url) = non_blank(ENV_API_BASE) {
        config.api.base_url = base_url;
    }
    if let Some(api_key) = non_blank(ENV_API_KEY) {
        config.api.api_key = api_key;
    }
    if let Some(level) = non_blank(ENV_LOG) {
        config.log_level = level;
    }
    config
}

fn validate(config: &ClientConfig) -> Result<()> {
    if config.api.base_url.trim().is_empty() {
        return Err(ClassroomError::config("api.base_url must not be empty"));
    }
    let default_year = &config.members.default_year;
    if !config.members.class_years.is_empty() && !config.members.class_years.contains(default_year)
    {
        return Err(ClassroomError::config(format!(
            "members.default_year '{}' is not one of members.class_years",
            default_year
        )));
    }
    Ok(())
}
