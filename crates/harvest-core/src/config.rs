//! Parser service configuration.
//!
//! Selection of the parser service implementation and its settings, loaded
//! by priority: a JSON config file named by `HARVEST_CONFIG_FILE`, then
//! environment variables, then the local default. A broken config file logs
//! a warning and falls back rather than failing startup.
//!
//! Environment variables:
//! - `HARVEST_SERVICE`: service type tag (`local` or `api`)
//! - `HARVEST_API_URL`: base URL of the remote parser API
//! - `HARVEST_API_KEY`: optional bearer token for the remote API
//! - `HARVEST_API_TIMEOUT`: remote request timeout in seconds
//! - `HARVEST_CONFIG_FILE`: path to a JSON config file overriding the above

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::warn;

/// Configuration for parser service selection and settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Service type tag looked up in the registry
    #[serde(default = "default_service_type")]
    pub service_type: String,

    /// Base URL of the remote parser API (api service only)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional bearer token for the remote parser API
    #[serde(default)]
    pub api_key: Option<String>,

    /// Remote request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            service_type: default_service_type(),
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ParserConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service_type: std::env::var("HARVEST_SERVICE")
                .unwrap_or(defaults.service_type),
            base_url: std::env::var("HARVEST_API_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("HARVEST_API_KEY").ok(),
            timeout_secs: std::env::var("HARVEST_API_TIMEOUT")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Load configuration from a JSON config file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON config file.
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Resolve configuration from the process environment.
    ///
    /// `HARVEST_CONFIG_FILE` wins when it names a readable config file;
    /// otherwise the remaining environment variables apply.
    pub async fn load() -> Self {
        if let Ok(config_path) = std::env::var("HARVEST_CONFIG_FILE") {
            match Self::from_file(&config_path).await {
                Ok(config) => return config,
                Err(e) => {
                    warn!(config_path, error = %e, "could not load config file, falling back to environment");
                }
            }
        }
        Self::from_env()
    }
}

fn default_service_type() -> String {
    "local".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
