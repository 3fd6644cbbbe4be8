//! Configuration for model providers

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default chat-completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Configuration for the remote model client
///
/// # Examples
///
/// ```
/// use paperlens_llm::ProviderConfig;
///
/// let config = ProviderConfig::default();
/// assert_eq!(config.max_attempts, 1);
/// assert_eq!(config.request_delay_ms, 500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Chat-completions URL
    pub endpoint: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Completion token cap
    pub max_tokens: u32,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Total attempts per request; 1 disables retry
    pub max_attempts: u32,

    /// Fixed delay after every request (milliseconds)
    pub request_delay_ms: u64,

    /// Environment variable the API key is read from
    pub api_key_env: String,

    /// Optional `HTTP-Referer` header identifying the caller
    pub referer: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            max_tokens: 2000,
            timeout_secs: 120,
            max_attempts: 1,
            request_delay_ms: 500,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            referer: None,
        }
    }
}

impl ProviderConfig {
    /// Cautious preset for shared keys: slower pacing and bounded retry
    pub fn conservative() -> Self {
        Self {
            max_attempts: 3,
            request_delay_ms: 2000,
            ..Self::default()
        }
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Post-request delay as a Duration
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be in [0.0, 2.0]".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProviderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 2000);
    }

    #[test]
    fn test_conservative_config_is_valid() {
        let config = ProviderConfig::conservative();
        assert!(config.validate().is_ok());
        assert!(config.max_attempts > 1);
    }

    #[test]
    fn test_invalid_zero_attempts() {
        let config = ProviderConfig {
            max_attempts: 0,
            ..ProviderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_temperature() {
        let config = ProviderConfig {
            temperature: 3.5,
            ..ProviderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ProviderConfig::from_toml("model = \"other/model\"\nmax_attempts = 3\n").unwrap();
        assert_eq!(config.model, "other/model");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.request_delay_ms, 500);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ProviderConfig::conservative();
        let toml_str = config.to_toml().unwrap();
        let parsed = ProviderConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
