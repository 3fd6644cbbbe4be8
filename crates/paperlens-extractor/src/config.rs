//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for text extraction and prompt construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum characters of document text sent to the model
    pub max_text_chars: usize,

    /// Minimum characters for a document to be worth analyzing
    pub min_text_chars: usize,

    /// Language the model writes descriptive fields in
    pub review_language: String,

    /// Replacement system prompt (topic-specific taxonomy), read at startup
    pub system_prompt_file: Option<PathBuf>,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_chars == 0 {
            return Err("max_text_chars must be greater than 0".to_string());
        }
        if self.min_text_chars >= self.max_text_chars {
            return Err("min_text_chars must be less than max_text_chars".to_string());
        }
        if self.review_language.trim().is_empty() {
            return Err("review_language must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Roughly 7,500 tokens of text per document
    fn default() -> Self {
        Self {
            max_text_chars: 30_000,
            min_text_chars: 100,
            review_language: "English".to_string(),
            system_prompt_file: None,
        }
    }
}

impl ExtractorConfig {
    /// Economy preset: less text per request for cheaper runs
    pub fn economy() -> Self {
        Self {
            max_text_chars: 12_000,
            ..Self::default()
        }
    }

    /// Thorough preset: more of each paper reaches the model
    pub fn thorough() -> Self {
        Self {
            max_text_chars: 80_000,
            ..Self::default()
        }
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
