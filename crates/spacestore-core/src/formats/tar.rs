//! Tar archive format reader.

use std::io::Read;

use crate::ExtractionError;
use crate::Result;
use crate::types::EntryType;

use super::traits::ArchiveEntry;
use super::traits::ArchiveReader;

/// Tar archive reader for ustar, GNU and PAX archives.
///
/// Entries are visited in stream order. GNU long names and PAX path
/// overrides are resolved by the `tar` crate before the entry is visited.
pub struct TarReader<R: Read> {
    archive: tar::Archive<R>,
}

impl<R: Read> TarReader<R> {
    /// Wraps a reader positioned at the start of a tar stream.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            archive: tar::Archive::new(reader),
        }
    }
}

impl<R: Read> ArchiveReader for TarReader<R> {
    fn for_each_entry(
        &mut self,
        visit: &mut dyn FnMut(ArchiveEntry<'_>) -> Result<()>,
    ) -> Result<()> {
        let entries = self.archive.entries().map_err(|e| {
            ExtractionError::InvalidArchive(format!("failed to read TAR entries: {e}"))
        })?;

        for entry_result in entries {
            let mut entry = entry_result.map_err(|e| {
                ExtractionError::InvalidArchive(format!("failed to read TAR entry: {e}"))
            })?;

            let entry_type = convert_tar_entry_type(entry.header().entry_type());
            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let size = entry.size();

            visit(ArchiveEntry {
                name,
                entry_type,
                size,
                reader: &mut entry,
            })?;
        }

        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "tar"
    }
}

fn convert_tar_entry_type(entry_type: tar::EntryType) -> EntryType {
    match entry_type {
        tar::EntryType::Regular | tar::EntryType::Continuous | tar::EntryType::GNUSparse => {
            EntryType::File
        }
        tar::EntryType::Directory => EntryType::Directory,
        tar::EntryType::Symlink => EntryType::Symlink,
        tar::EntryType::Link => EntryType::Hardlink,
        // Char/block devices, FIFOs, PAX global headers and unknown types
        _ => EntryType::Other,
    }
}
