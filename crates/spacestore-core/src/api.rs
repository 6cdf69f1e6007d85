//! High-level public API for archive extraction.

use std::path::Path;

use crate::ExtractionReport;
use crate::Result;
use crate::extraction::ExtractionEngine;
use crate::formats::detect::ArchiveType;

/// Extracts a staged archive into `destination_root/<base name>/`.
///
/// The base name is the archive's file name without its `.zip` or `.tar`
/// suffix. On success the staged archive is deleted; on failure it is left
/// in place and the target directory receives nothing from the archive.
///
/// # Arguments
///
/// * `archive_path` - Path to the staged archive file
/// * `archive_type` - Format detected from the file name
/// * `destination_root` - Tenant root directory that receives the target
///
/// # Errors
///
/// Returns an error if:
/// - The archive cannot be opened or is corrupt
/// - Any entry escapes the target directory or is a link
/// - I/O operations fail
///
/// # Examples
///
/// ```no_run
/// use spacestore_core::ArchiveType;
/// use spacestore_core::extract_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = extract_archive(
///     "uploads/acme/report.zip",
///     ArchiveType::Zip,
///     "uploads/acme",
/// )?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    archive_type: ArchiveType,
    destination_root: Q,
) -> Result<ExtractionReport> {
    ExtractionEngine::new().extract(
        archive_path.as_ref(),
        archive_type,
        destination_root.as_ref(),
    )
}
