//! Configuration for batch runs

use serde::{Deserialize, Serialize};

/// Configuration for the batch orchestrator
///
/// # Examples
///
/// ```
/// use paperlens_batch::BatchConfig;
///
/// let config = BatchConfig::default();
/// assert_eq!(config.progress_interval, 10);
/// assert!(config.write_raw_responses);
///
/// let config = BatchConfig::verbose();
/// assert_eq!(config.progress_interval, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Emit a checkpoint (counts and ETA) every this many units
    /// Default: 10
    pub progress_interval: usize,

    /// Keep unparseable model responses beside the failure record
    /// Default: true
    pub write_raw_responses: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            progress_interval: 10,
            write_raw_responses: true,
        }
    }
}

impl BatchConfig {
    /// Checkpoint after every unit
    pub fn verbose() -> Self {
        Self {
            progress_interval: 1,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.progress_interval == 0 {
            return Err("progress_interval must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
