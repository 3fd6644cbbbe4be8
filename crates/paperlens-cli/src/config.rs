//! Configuration management for the CLI.
//!
//! One TOML file composes every crate's configuration section. Flags and
//! environment variables override the file.

use crate::error::{CliError, Result};
use paperlens_aggregator::AggregateConfig;
use paperlens_batch::BatchConfig;
use paperlens_extractor::ExtractorConfig;
use paperlens_llm::ProviderConfig;
use paperlens_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Collection root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Global settings
    pub settings: Settings,

    /// Collection layout
    pub store: StoreConfig,

    /// Text extraction and prompt
    pub extractor: ExtractorConfig,

    /// Model endpoint
    pub provider: ProviderConfig,

    /// Batch run
    pub batch: BatchConfig,

    /// Summary and export
    pub aggregate: AggregateConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Default configuration file path (`~/.paperlens/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".paperlens").join("config.toml"))
    }

    /// Load configuration from `path`, or defaults if the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply command-line and environment overrides.
    pub fn apply_overrides(&mut self, root: Option<PathBuf>, model: Option<String>) {
        if let Some(root) = root {
            self.root = Some(root);
        }
        if let Some(model) = model {
            self.provider.model = model;
        }
    }

    /// Collection root, required by every command that reads records.
    pub fn root(&self) -> Result<&Path> {
        self.root.as_deref().ok_or_else(|| {
            CliError::Config("No collection root; pass --root or set PAPERLENS_ROOT".into())
        })
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        let sections: [(&str, std::result::Result<(), String>); 5] = [
            ("store", self.store.validate()),
            ("extractor", self.extractor.validate()),
            ("provider", self.provider.validate()),
            ("batch", self.batch.validate()),
            ("aggregate", self.aggregate.validate()),
        ];
        for (name, result) in sections {
            result.map_err(|e| CliError::Config(format!("[{}] {}", name, e)))?;
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
