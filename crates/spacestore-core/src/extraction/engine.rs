//! Core extraction engine.

use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::ExtractionError;
use crate::ExtractionReport;
use crate::Result;
use crate::formats::ArchiveReader;
use crate::formats::ArchiveType;
use crate::formats::open_reader;
use crate::security::validate_entry;
use crate::types::DestDir;
use crate::types::EntryType;

use super::atomic::atomic_extract;
use super::stream::COPY_BUFFER_SIZE;
use super::stream::CopyBuffer;
use super::stream::copy_entry;

/// Extracts staged archives into tenant directories.
///
/// The engine works against [`ArchiveReader`] only, so ZIP and TAR share
/// the same validation, write and commit path. One copy buffer is reused
/// across all entries of an extraction.
#[derive(Debug, Default)]
pub struct ExtractionEngine {
    buffer: CopyBuffer,
}

impl ExtractionEngine {
    /// Creates a new extraction engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts `archive_path` into `destination_root/<base name>/`.
    ///
    /// The staged archive is deleted after a successful extraction and left
    /// in place on failure.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered. Nothing from the archive is
    /// written into the target directory in that case.
    pub fn extract(
        &mut self,
        archive_path: &Path,
        archive_type: ArchiveType,
        destination_root: &Path,
    ) -> Result<ExtractionReport> {
        let start = Instant::now();

        let file_name = archive_path
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| {
                ExtractionError::InvalidArchive(format!(
                    "archive path has no usable file name: {}",
                    archive_path.display()
                ))
            })?;
        let base_name = archive_type.base_name(file_name)?;

        let mut reader = open_reader(archive_path, archive_type)?;
        let target = DestDir::create(destination_root.join(&base_name))?;

        debug!(
            archive = %archive_path.display(),
            format = reader.format_name(),
            target = %target.as_path().display(),
            "extracting archive"
        );

        let mut report =
            atomic_extract(&target, |scratch| self.unpack(reader.as_mut(), &target, scratch))?;

        report.destination = target.into_path_buf();
        report.archive_removed = remove_staged_archive(archive_path, &mut report);
        report.duration = start.elapsed();

        info!(
            archive = %archive_path.display(),
            destination = %report.destination.display(),
            files = report.files_extracted,
            directories = report.directories_created,
            skipped = report.entries_skipped,
            bytes = report.bytes_written,
            duration_ms = report.duration.as_millis(),
            "extraction complete"
        );

        Ok(report)
    }

    /// Validates and writes each entry in container order.
    ///
    /// Paths are validated against `target` and written under `scratch`,
    /// which mirrors the target layout until commit.
    fn unpack(
        &mut self,
        reader: &mut dyn ArchiveReader,
        target: &DestDir,
        scratch: &DestDir,
    ) -> Result<ExtractionReport> {
        let mut report = ExtractionReport::new();
        let buffer = &mut self.buffer;

        reader.for_each_entry(&mut |entry| {
            let safe = validate_entry(&entry.name, entry.entry_type, target)?;
            let output = scratch.join(&safe.path);

            match safe.entry_type {
                EntryType::Directory => {
                    fs::create_dir_all(&output)?;
                    report.directories_created += 1;
                }
                EntryType::File => {
                    if let Some(parent) = output.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    let mut writer =
                        BufWriter::with_capacity(COPY_BUFFER_SIZE, File::create(&output)?);
                    let written = copy_entry(entry.reader, &mut writer, buffer)?;
                    writer.flush()?;

                    report.files_extracted += 1;
                    report.bytes_written += written;
                }
                // Links never pass validation.
                EntryType::Symlink | EntryType::Hardlink | EntryType::Other => {
                    report.entries_skipped += 1;
                }
            }

            debug!(
                entry = %safe.path.as_path().display(),
                kind = safe.entry_type.name(),
                size = entry.size,
                "entry processed"
            );
            Ok(())
        })?;

        Ok(report)
    }
}

/// Deletes the staged archive, recording a warning if that fails.
fn remove_staged_archive(archive_path: &Path, report: &mut ExtractionReport) -> bool {
    match fs::remove_file(archive_path) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                archive = %archive_path.display(),
                error = %e,
                "extracted archive could not be removed"
            );
            report.add_warning(format!(
                "failed to remove staged archive {}: {e}",
                archive_path.display()
            ));
            false
        }
    }
}
