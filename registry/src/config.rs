//! Registry client configuration with TOML file support.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};

/// Configuration for a registry client.
///
/// Can be loaded from a TOML file via [`RegistryConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of the registry node's JSON-RPC endpoint.
    #[serde(default = "default_node_url")]
    pub node_url: String,

    /// Freshness interval for cached registry parameters, in seconds.
    #[serde(default = "default_param_ttl_secs")]
    pub param_ttl_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_node_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_param_ttl_secs() -> u64 {
    300
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl RegistryConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, RegistryError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RegistryError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, RegistryError> {
        toml::from_str(s).map_err(|e| RegistryError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("RegistryConfig is always serializable to TOML")
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            node_url: default_node_url(),
            param_ttl_secs: default_param_ttl_secs(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
