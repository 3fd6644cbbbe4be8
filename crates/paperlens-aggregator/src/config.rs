//! Configuration for aggregation, reporting, and export

use paperlens_domain::Category;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How many representatives of a background category to export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundQuota {
    /// Category to draw from
    pub category: Category,
    /// Maximum papers exported
    pub limit: usize,
}

/// Configuration for the aggregator
///
/// # Examples
///
/// ```
/// use paperlens_aggregator::AggregateConfig;
///
/// let config = AggregateConfig::default();
/// assert_eq!(config.top_n, 30);
/// assert_eq!(config.core_min_score, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// Entries kept in the method and technique tables
    pub top_n: usize,

    /// Categories counted as core papers
    pub core_categories: Vec<Category>,

    /// Minimum relevance for a core paper
    pub core_min_score: u8,

    /// Core papers listed in the report
    pub core_list_limit: usize,

    /// Categories exported to `core_papers.json`
    pub export_categories: Vec<Category>,

    /// Background representatives exported to `background_papers.json`
    pub background: Vec<BackgroundQuota>,

    /// TOML file replacing the built-in normalization rules
    pub rules_file: Option<PathBuf>,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            top_n: 30,
            core_categories: vec![Category::E],
            core_min_score: 4,
            core_list_limit: 20,
            export_categories: vec![Category::D, Category::E],
            background: vec![
                BackgroundQuota {
                    category: Category::A,
                    limit: 15,
                },
                BackgroundQuota {
                    category: Category::B,
                    limit: 8,
                },
                BackgroundQuota {
                    category: Category::C,
                    limit: 15,
                },
            ],
            rules_file: None,
        }
    }
}

impl AggregateConfig {
    /// Whether a paper in `category` with `score` is a core paper
    pub fn is_core(&self, category: Category, score: u8) -> bool {
        self.core_categories.contains(&category) && score >= self.core_min_score
    }

    /// Short description of the core-paper rule, e.g. `E, score >= 4`
    pub fn core_label(&self) -> String {
        let categories: Vec<&str> = self.core_categories.iter().map(Category::as_str).collect();
        format!("{}, score >= {}", categories.join("+"), self.core_min_score)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.top_n == 0 {
            return Err("top_n must be greater than 0".to_string());
        }
        if self.core_categories.is_empty() {
            return Err("core_categories must not be empty".to_string());
        }
        if !(1..=5).contains(&self.core_min_score) {
            return Err("core_min_score must be in [1, 5]".to_string());
        }
        if self.export_categories.is_empty() {
            return Err("export_categories must not be empty".to_string());
        }
        for (i, quota) in self.background.iter().enumerate() {
            if self.background[..i].iter().any(|q| q.category == quota.category) {
                return Err(format!("background category {} listed twice", quota.category));
            }
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
    fn test_is_core() {
        let config = AggregateConfig::default();
        assert!(config.is_core(Category::E, 4));
        assert!(config.is_core(Category::E, 5));
        assert!(!config.is_core(Category::E, 3));
        assert!(!config.is_core(Category::D, 5));
    }

    #[test]
    fn test_core_label() {
        assert_eq!(AggregateConfig::default().core_label(), "E, score >= 4");
        let config = AggregateConfig {
            core_categories: vec![Category::D, Category::E],
            core_min_score: 5,
            ..AggregateConfig::default()
        };
        assert_eq!(config.core_label(), "D+E, score >= 5");
    }

    #[test]
    fn test_duplicate_background_is_invalid() {
        let mut config = AggregateConfig::default();
        config.background.push(BackgroundQuota {
            category: Category::A,
            limit: 1,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_core_score() {
        let config = AggregateConfig {
            core_min_score: 9,
            ..AggregateConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AggregateConfig {
            core_categories: vec![Category::D, Category::E],
            rules_file: Some(PathBuf::from("rules.toml")),
            ..AggregateConfig::default()
        };
        let parsed = AggregateConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_background_from_toml() {
        let config = AggregateConfig::from_toml(
            "[[background]]\ncategory = \"B\"\nlimit = 3\n",
        )
        .unwrap();
        assert_eq!(config.background.len(), 1);
        assert_eq!(config.background[0].category, Category::B);
        assert_eq!(config.top_n, 30);
    }
}
