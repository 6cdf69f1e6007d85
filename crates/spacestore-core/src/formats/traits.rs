//! Common traits for archive format readers.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use crate::Result;
use crate::types::EntryType;

use super::detect::ArchiveType;
use super::tar::TarReader;
use super::zip::ZipReader;

/// One record of an archive, handed to the visitor of
/// [`ArchiveReader::for_each_entry`].
///
/// The reader yields the entry's uncompressed content and is only valid for
/// the duration of the visit.
pub struct ArchiveEntry<'a> {
    /// Raw entry name as stored in the archive. Untrusted.
    pub name: String,
    /// Entry type from the archive's own type flag.
    pub entry_type: EntryType,
    /// Declared uncompressed size in bytes.
    pub size: u64,
    /// Entry content.
    pub reader: &'a mut dyn Read,
}

impl std::fmt::Debug for ArchiveEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("name", &self.name)
            .field("entry_type", &self.entry_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Format-agnostic access to the entries of an archive.
///
/// Entries form a lazy, finite, non-restartable sequence in container
/// order. ZIP and TAR differ only in how they open the container and step
/// through it; everything the engine does with an entry is written once
/// against this trait.
pub trait ArchiveReader {
    /// Calls `visit` for each entry in container order.
    ///
    /// Iteration stops at the first error, whether it comes from reading
    /// the archive or from `visit`, and that error is returned. Entries
    /// after the failing one are never produced.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidArchive` if the container is
    /// corrupt, or the first error returned by `visit`.
    fn for_each_entry(
        &mut self,
        visit: &mut dyn FnMut(ArchiveEntry<'_>) -> Result<()>,
    ) -> Result<()>;

    /// Returns the archive format name.
    fn format_name(&self) -> &'static str;
}

/// Opens a staged archive file with the reader for its format.
///
/// # Errors
///
/// Returns `ExtractionError::Io` if the file cannot be opened, or
/// `ExtractionError::InvalidArchive` if a ZIP central directory is
/// unreadable.
pub fn open_reader(path: &Path, archive_type: ArchiveType) -> Result<Box<dyn ArchiveReader>> {
    let file = BufReader::new(File::open(path)?);
    Ok(match archive_type {
        ArchiveType::Zip => Box::new(ZipReader::new(file)?),
        ArchiveType::Tar => Box::new(TarReader::new(file)),
    })
}
