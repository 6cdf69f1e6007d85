//! Validated safe path type for archive extraction.

use crate::ExtractionError;
use crate::Result;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use super::DestDir;
use super::EntryType;

/// A normalized relative path that is safe to join onto a [`DestDir`].
///
/// `SafePath` can ONLY be constructed through [`SafePath::sanitize`]. There is
/// deliberately no `From<PathBuf>` implementation: every archive entry name
/// goes through the same check before anything touches the filesystem.
///
/// # Examples
///
/// ```no_run
/// use spacestore_core::types::{DestDir, EntryType, SafePath};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::create("/tmp/extraction")?;
///
/// let safe = SafePath::sanitize("sub/data.bin", &dest, EntryType::File)?;
/// assert!(dest.join(&safe).ends_with("sub/data.bin"));
///
/// assert!(SafePath::sanitize("../../etc/passwd", &dest, EntryType::File).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(PathBuf);

impl SafePath {
    /// Sanitizes a raw archive entry name against a destination directory.
    ///
    /// # Validation Steps
    ///
    /// 1. Reject names containing NUL bytes
    /// 2. Split on both `/` and `\`
    /// 3. Drop empty and `.` segments, which also strips absolute prefixes
    /// 4. Resolve `..` against the preceding segment; a `..` with nothing
    ///    left to pop escapes the destination and is rejected
    /// 5. Join onto the destination and verify the result is the
    ///    destination itself or lies beneath it
    ///
    /// A root-level result is accepted for directory entries only.
    ///
    /// # Errors
    ///
    /// - `ExtractionError::SecurityViolation` for NUL bytes
    /// - `ExtractionError::PathTraversal` if the name escapes `dest`
    /// - `ExtractionError::InvalidArchive` for a file entry with no name
    pub fn sanitize(name: &str, dest: &DestDir, entry_type: EntryType) -> Result<Self> {
        if name.contains('\0') {
            return Err(ExtractionError::SecurityViolation {
                reason: format!("entry name contains null bytes: {name:?}"),
            });
        }

        let mut segments: Vec<&str> = Vec::new();
        for segment in name.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(traversal(name));
                    }
                }
                normal => segments.push(normal),
            }
        }

        let relative: PathBuf = segments.iter().collect();

        if relative.as_os_str().is_empty() && !entry_type.is_directory() {
            return Err(ExtractionError::InvalidArchive(format!(
                "{} entry has an empty name: {name:?}",
                entry_type.name()
            )));
        }

        // A segment can still carry platform meaning (a drive prefix such as
        // `C:` on Windows), so the joined result is checked as well.
        let only_normal = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        let resolved = dest.as_path().join(&relative);

        if !only_normal || !dest.contains(&resolved) {
            return Err(traversal(name));
        }

        Ok(Self(relative))
    }

    /// Returns the normalized relative path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns `true` if this path denotes the destination root itself.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }
}

fn traversal(name: &str) -> ExtractionError {
    ExtractionError::PathTraversal {
        path: PathBuf::from(name),
    }
}
