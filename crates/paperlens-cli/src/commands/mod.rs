//! Command implementations.

pub mod analyze;
pub mod config;
pub mod export;
pub mod summarize;

pub use self::analyze::execute_analyze;
pub use self::config::execute_config;
pub use self::export::execute_export;
pub use self::summarize::execute_summarize;

use crate::config::Config;
use crate::error::{CliError, Result};
use paperlens_aggregator::{Aggregator, Normalizer};
use paperlens_store::CollectionStore;
use std::fs;

/// Open the configured collection.
pub(crate) fn open_store(config: &Config) -> Result<CollectionStore> {
    Ok(CollectionStore::open(config.root()?, config.store.clone())?)
}

/// Build the aggregator, loading custom normalization rules if configured.
pub(crate) fn build_aggregator(config: &Config) -> Result<Aggregator> {
    let normalizer = match &config.aggregate.rules_file {
        Some(path) => {
            let contents = fs::read_to_string(path).map_err(|e| {
                CliError::Config(format!("Cannot read rules file {}: {}", path.display(), e))
            })?;
            Normalizer::from_toml(&contents)
                .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?
        }
        None => Normalizer::default(),
    };
    Ok(Aggregator::new(config.aggregate.clone(), normalizer)?)
}
