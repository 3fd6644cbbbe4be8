//! Configuration for the document collection

use serde::{Deserialize, Serialize};

/// Layout of the document collection on disk
///
/// # Examples
///
/// ```
/// use paperlens_store::StoreConfig;
///
/// let config = StoreConfig::default();
/// assert!(config.is_document("Paper.PDF"));
/// assert!(!config.is_document("notes.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// File extensions recognized as the unit's document (case-insensitive)
    pub document_extensions: Vec<String>,

    /// File name of the output record inside each unit folder
    pub record_file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            document_extensions: vec!["pdf".to_string()],
            record_file_name: "analysis.json".to_string(),
        }
    }
}

impl StoreConfig {
    /// Whether `file_name` has one of the document extensions
    pub fn is_document(&self, file_name: &str) -> bool {
        if file_name.starts_with('.') {
            return false;
        }
        match file_name.rsplit_once('.') {
            Some((_, ext)) => self
                .document_extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.document_extensions.is_empty() {
            return Err("document_extensions must not be empty".to_string());
        }
        if self.record_file_name.trim().is_empty() {
            return Err("record_file_name must not be empty".to_string());
        }
        if self.record_file_name.contains(['/', '\\']) {
            return Err("record_file_name must be a bare file name".to_string());
        }
        if self.is_document(&self.record_file_name) {
            return Err("record_file_name must not use a document extension".to_string());
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
