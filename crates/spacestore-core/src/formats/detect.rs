//! Archive format detection.

use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;

/// Archive formats that are unpacked after upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveType {
    /// ZIP archive.
    Zip,
    /// Tar archive (uncompressed).
    Tar,
}

impl ArchiveType {
    /// File name suffix that selects this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => ".zip",
            Self::Tar => ".tar",
        }
    }

    /// Returns the format name used in logs and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
        }
    }

    /// Returns the extraction subdirectory name for an archive file name.
    ///
    /// Leading directories are dropped and the format suffix is stripped,
    /// so `uploads/acme/report.zip` yields `report`.
    ///
    /// # Errors
    ///
    /// - `ExtractionError::InvalidArchive` if the file name does not end with
    ///   this format's suffix
    /// - `ExtractionError::PathTraversal` if what is left is empty, `.` or
    ///   `..`
    ///
    /// # Examples
    ///
    /// ```
    /// use spacestore_core::formats::detect::ArchiveType;
    ///
    /// assert_eq!(ArchiveType::Zip.base_name("report.zip").unwrap(), "report");
    /// assert_eq!(ArchiveType::Tar.base_name("backup.2024.tar").unwrap(), "backup.2024");
    /// assert!(ArchiveType::Zip.base_name(".zip").is_err());
    /// ```
    pub fn base_name(self, file_name: &str) -> Result<String> {
        let file_name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        match file_name.strip_suffix(self.extension()) {
            // `..zip` and `...zip` would name the tenant root or its parent.
            Some(base) if !matches!(base, "" | "." | "..") => Ok(base.to_string()),
            Some(_) => Err(ExtractionError::PathTraversal {
                path: PathBuf::from(file_name),
            }),
            None => Err(ExtractionError::InvalidArchive(format!(
                "archive name {file_name:?} does not end with {}",
                self.extension()
            ))),
        }
    }
}

impl std::fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Detects the archive type from an uploaded file name.
///
/// Matching is a case-sensitive suffix check. Anything else, including
/// `REPORT.ZIP` or `archive.tar.gz`, is an opaque file and returns `None`.
///
/// # Examples
///
/// ```
/// use spacestore_core::formats::detect::{ArchiveType, detect_format};
///
/// assert_eq!(detect_format("report.zip"), Some(ArchiveType::Zip));
/// assert_eq!(detect_format("plain.txt"), None);
/// ```
#[must_use]
pub fn detect_format(file_name: &str) -> Option<ArchiveType> {
    if file_name.ends_with(ArchiveType::Zip.extension()) {
        Some(ArchiveType::Zip)
    } else if file_name.ends_with(ArchiveType::Tar.extension()) {
        Some(ArchiveType::Tar)
    } else {
        None
    }
}
