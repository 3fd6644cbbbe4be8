//! paperlens Storage Layer
//!
//! Implements the `RecordStore` trait over a directory of document units.
//!
//! # Architecture
//!
//! - One folder per unit; the folder name is the unit key
//! - The first document file (sorted by name) is the unit's document
//! - The output record is a pretty-printed JSON file beside the document
//! - Writes go through a temp file and an atomic rename
//!
//! # Examples
//!
//! ```no_run
//! use paperlens_store::{CollectionStore, StoreConfig};
//! use paperlens_domain::RecordStore;
//!
//! let store = CollectionStore::open("/data/library", StoreConfig::default()).unwrap();
//! for unit in store.units().unwrap() {
//!     println!("{} pending={}", unit.key, unit.is_pending());
//! }
//! ```

#![warn(missing_docs)]

pub mod atomic;
pub mod config;

use paperlens_domain::{AnalysisRecord, DocumentUnit, RecordStore, StoredRecord, UnitKey};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub use atomic::write_atomic;
pub use config::StoreConfig;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error on a specific path
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Collection root is missing or not a directory
    #[error("Invalid collection root: {0}")]
    InvalidRoot(String),

    /// Invalid store configuration
    #[error("Invalid store configuration: {0}")]
    Config(String),

    /// Record could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Directory-backed document collection
///
/// The filesystem is the only state: a unit is "done" exactly when its record
/// file exists.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    root: PathBuf,
    config: StoreConfig,
}

impl CollectionStore {
    /// Open a collection rooted at `root`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidRoot` if `root` is not a readable directory
    /// and `StoreError::Config` for an invalid configuration.
    pub fn open<P: AsRef<Path>>(root: P, config: StoreConfig) -> Result<Self, StoreError> {
        config.validate().map_err(StoreError::Config)?;

        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(StoreError::InvalidRoot(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        fs::read_dir(&root)
            .map_err(|e| StoreError::InvalidRoot(format!("{}: {}", root.display(), e)))?;

        Ok(Self { root, config })
    }

    /// Collection root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the raw-response sidecar kept beside a unit's record
    pub fn raw_response_path(unit: &DocumentUnit) -> PathBuf {
        unit.record_path.with_extension("raw.txt")
    }

    fn build_unit(&self, key: UnitKey, dir: PathBuf) -> Result<DocumentUnit, StoreError> {
        let document = self.find_document(&dir)?;
        let record_path = dir.join(&self.config.record_file_name);
        let has_record = record_path.is_file();
        Ok(DocumentUnit {
            key,
            dir,
            document,
            record_path,
            has_record,
        })
    }

    fn find_document(&self, dir: &Path) -> Result<Option<PathBuf>, StoreError> {
        let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(dir, e))?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if path.is_file() && self.config.is_document(name) {
                candidates.push(path);
            }
        }

        candidates.sort();
        Ok(candidates.into_iter().next())
    }
}

impl RecordStore for CollectionStore {
    type Error = StoreError;

    fn units(&self) -> Result<Vec<DocumentUnit>, Self::Error> {
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) if !name.starts_with('.') => dirs.push((name, path)),
                Ok(_) => {}
                Err(name) => debug!(?name, "Skipping non UTF-8 folder name"),
            }
        }
        dirs.sort_by(|a, b| a.0.cmp(&b.0));

        dirs.into_iter()
            .map(|(name, path)| self.build_unit(UnitKey::new(name), path))
            .collect()
    }

    fn unit(&self, key: &UnitKey) -> Result<Option<DocumentUnit>, Self::Error> {
        let name = key.as_str();
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return Ok(None);
        }
        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Ok(None);
        }
        self.build_unit(key.clone(), dir).map(Some)
    }

    fn has_record(&self, unit: &DocumentUnit) -> bool {
        unit.record_path.is_file()
    }

    fn load_record(&self, unit: &DocumentUnit) -> Result<Option<StoredRecord>, Self::Error> {
        let bytes = match fs::read(&unit.record_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&unit.record_path, e)),
        };

        let stored = match serde_json::from_slice::<AnalysisRecord>(&bytes) {
            Ok(record) => StoredRecord::Parsed(record),
            Err(e) => StoredRecord::Malformed {
                reason: e.to_string(),
            },
        };
        Ok(Some(stored))
    }

    fn write_record(&self, unit: &DocumentUnit, record: &AnalysisRecord) -> Result<(), Self::Error> {
        let mut json = serde_json::to_string_pretty(record)?;
        json.push('\n');
        write_atomic(&unit.record_path, json.as_bytes())
            .map_err(|e| StoreError::io(&unit.record_path, e))?;

        if record.is_success() {
            let raw_path = Self::raw_response_path(unit);
            match fs::remove_file(&raw_path) {
                Ok(()) => debug!(path = %raw_path.display(), "Removed stale raw response"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(
                    path = %raw_path.display(),
                    "Could not remove stale raw response: {}",
                    e
                ),
            }
        }
        Ok(())
    }

    fn write_raw_response(&self, unit: &DocumentUnit, raw: &str) -> Result<(), Self::Error> {
        let raw_path = Self::raw_response_path(unit);
        write_atomic(&raw_path, raw.as_bytes()).map_err(|e| StoreError::io(&raw_path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let result = CollectionStore::open(dir.path().join("nope"), StoreConfig::default());
        assert!(matches!(result, Err(StoreError::InvalidRoot(_))));
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            document_extensions: vec![],
            ..StoreConfig::default()
        };
        let result = CollectionStore::open(dir.path(), config);
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn test_raw_response_path_sits_beside_record() {
        let unit = DocumentUnit {
            key: UnitKey::new("K"),
            dir: PathBuf::from("/lib/K"),
            document: None,
            record_path: PathBuf::from("/lib/K/analysis.json"),
            has_record: false,
        };
        assert_eq!(
            CollectionStore::raw_response_path(&unit),
            PathBuf::from("/lib/K/analysis.raw.txt")
        );
    }

    #[test]
    fn test_unit_lookup_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("A")).unwrap();
        let store = CollectionStore::open(dir.path(), StoreConfig::default()).unwrap();

        assert!(store.unit(&UnitKey::new("A")).unwrap().is_some());
        assert!(store.unit(&UnitKey::new("../A")).unwrap().is_none());
        assert!(store.unit(&UnitKey::new("")).unwrap().is_none());
        assert!(store.unit(&UnitKey::new("missing")).unwrap().is_none());
    }
}
