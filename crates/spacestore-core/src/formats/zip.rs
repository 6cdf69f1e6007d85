//! ZIP archive format reader.

use std::io::Read;
use std::io::Seek;

use crate::ExtractionError;
use crate::Result;
use crate::types::EntryType;

use super::traits::ArchiveEntry;
use super::traits::ArchiveReader;

/// Unix file type mask and symlink type, as stored in ZIP external
/// attributes.
const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// ZIP archive reader.
///
/// Entries are visited in central directory order.
pub struct ZipReader<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
}

impl<R: Read + Seek> ZipReader<R> {
    /// Reads the central directory of a ZIP archive.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidArchive` if the data is not a
    /// readable ZIP archive.
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader).map_err(|e| {
            ExtractionError::InvalidArchive(format!("failed to open ZIP archive: {e}"))
        })?;
        Ok(Self { archive })
    }

    /// Returns the number of entries in the central directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

impl<R: Read + Seek> ArchiveReader for ZipReader<R> {
    fn for_each_entry(
        &mut self,
        visit: &mut dyn FnMut(ArchiveEntry<'_>) -> Result<()>,
    ) -> Result<()> {
        for index in 0..self.archive.len() {
            let mut file = self.archive.by_index(index).map_err(|e| {
                ExtractionError::InvalidArchive(format!("failed to read ZIP entry {index}: {e}"))
            })?;

            let entry_type = if file.is_dir() {
                EntryType::Directory
            } else if file.unix_mode().is_some_and(|mode| mode & S_IFMT == S_IFLNK) {
                EntryType::Symlink
            } else {
                EntryType::File
            };

            let entry = ArchiveEntry {
                name: file.name().to_string(),
                entry_type,
                size: file.size(),
                reader: &mut file,
            };
            visit(entry)?;
        }

        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "zip"
    }
}
