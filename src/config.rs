//! Configuration System
//!
//! Layered runtime configuration: built-in defaults, the user config file,
//! an explicit `--config` file, then `ETCDEXTRACT__*` environment variables.
//! CLI flags are applied on top by the binary.

use crate::error::ExtractError;
use crate::logging::LoggingConfig;
use crate::publish::DEFAULT_PUBLISH_TIMEOUT;
use crate::store::{DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod facade;
mod merge_policy;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::user_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Store connection settings
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP publication settings
    #[serde(default)]
    pub publish: PublishConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Deadline for one recursive root read
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl StoreConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// HTTP publication settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Limit for one POST, including reading the response
    #[serde(default = "default_publish_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_publish_timeout_secs() -> u64 {
    DEFAULT_PUBLISH_TIMEOUT.as_secs()
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_publish_timeout_secs(),
        }
    }
}

impl PublishConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ExtractConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ExtractError> {
        let mut errors = Vec::new();

        if self.store.endpoint.trim().is_empty() {
            errors.push("store.endpoint cannot be empty".to_string());
        }
        if self.store.request_timeout_secs == 0 {
            errors.push("store.request_timeout_secs must be greater than zero".to_string());
        }
        if self.publish.timeout_secs == 0 {
            errors.push("publish.timeout_secs must be greater than zero".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ExtractError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }
}
