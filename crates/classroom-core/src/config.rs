//! Client configuration model.
//!
//! Stored as `config.toml` in the platform config directory. Every section
//! has defaults, so an empty or partial file is valid.

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://cis.kku.ac.th/api";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Value for the `x-api-key` header. Empty means the header is not sent.
    pub api_key: String,
    /// Per-request timeout. `None` leaves the transport default in place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembersConfig {
    /// Enrollment years offered by the member directory.
    pub class_years: Vec<String>,
    pub default_year: String,
}

impl Default for MembersConfig {
    fn default() -> Self {
        Self {
            class_years: vec!["2565".to_string(), "2566".to_string(), "2567".to_string()],
            default_year: "2565".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Run feed mutate-then-refetch cycles one at a time.
    pub serialize_mutations: bool,
}

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub log_level: String,
    pub api: ApiConfig,
    pub members: MembersConfig,
    pub sync: SyncConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api: ApiConfig::default(),
            members: MembersConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}
