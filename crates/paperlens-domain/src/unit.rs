//! Document unit module - one source document and its derived artifacts

use std::fmt;
use std::path::{Path, PathBuf};

/// Stable key of a document unit (the folder name in the collection)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitKey(String);

impl UnitKey {
    /// Create a key from a folder name
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One document unit as seen at enumeration time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUnit {
    /// Folder name
    pub key: UnitKey,
    /// Folder path
    pub dir: PathBuf,
    /// The binary document, if the folder contains one
    pub document: Option<PathBuf>,
    /// Where the output record lives (whether or not it exists yet)
    pub record_path: PathBuf,
    /// Whether an output record existed when the unit was enumerated
    pub has_record: bool,
}

impl DocumentUnit {
    /// File name of the document, used in prompts and progress lines
    pub fn document_name(&self) -> Option<&str> {
        self.document
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
    }

    /// Whether the unit still needs an output record
    pub fn is_pending(&self) -> bool {
        self.document.is_some() && !self.has_record
    }
}
