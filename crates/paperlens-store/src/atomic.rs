//! Crash-safe file replacement

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `contents` to `path` so that the file is either absent, the old
/// version, or the complete new version
///
/// The temp file lives in the destination directory so the final rename
/// never crosses a filesystem.
///
/// # Examples
///
/// ```
/// use paperlens_store::write_atomic;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("summary.json");
/// write_atomic(&path, b"{}").unwrap();
/// assert_eq!(std::fs::read(&path).unwrap(), b"{}");
/// ```
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
