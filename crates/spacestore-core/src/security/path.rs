//! Path traversal validation for archive entries.

use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::types::DestDir;
use crate::types::EntryType;
use crate::types::SafePath;

/// An archive entry that passed validation and may be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeEntry {
    /// Sanitized path relative to the destination directory.
    pub path: SafePath,
    /// Entry type as declared by the archive.
    pub entry_type: EntryType,
}

/// Validates one archive entry against the destination directory.
///
/// The entry name is sanitized first (see [`SafePath::sanitize`]), so a
/// traversal attempt is always reported as such regardless of entry type.
/// Link entries are then rejected: the engine never materializes symlinks
/// or hardlinks.
///
/// This runs for every entry of every archive, one entry at a time,
/// immediately before the entry is written.
///
/// # Errors
///
/// - `ExtractionError::PathTraversal` if the name escapes `dest`
/// - `ExtractionError::SecurityViolation` for NUL bytes in the name
/// - `ExtractionError::UnsupportedEntry` for symlinks and hardlinks
/// - `ExtractionError::InvalidArchive` for a file entry with no name
///
/// # Examples
///
/// ```no_run
/// use spacestore_core::security::validate_entry;
/// use spacestore_core::types::{DestDir, EntryType};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::create("/tmp/extraction")?;
///
/// let entry = validate_entry("notes.txt", EntryType::File, &dest)?;
/// assert!(entry.entry_type.is_file());
///
/// assert!(validate_entry("../../etc/passwd", EntryType::File, &dest).is_err());
/// # Ok(())
/// # }
/// ```
pub fn validate_entry(name: &str, entry_type: EntryType, dest: &DestDir) -> Result<SafeEntry> {
    let path = SafePath::sanitize(name, dest, entry_type)?;

    if entry_type.is_link() {
        return Err(ExtractionError::UnsupportedEntry {
            path: PathBuf::from(name),
            kind: entry_type.name(),
        });
    }

    Ok(SafeEntry { path, entry_type })
}
