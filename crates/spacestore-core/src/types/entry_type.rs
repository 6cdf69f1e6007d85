//! Archive entry type enumeration.

/// Type of entry in an archive, taken from the entry's own type flag.
///
/// # Examples
///
/// ```
/// use spacestore_core::types::EntryType;
///
/// assert!(EntryType::Directory.is_directory());
/// assert!(EntryType::File.is_file());
/// assert!(EntryType::Symlink.is_link());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Regular file entry.
    File,

    /// Directory entry.
    Directory,

    /// Symbolic link entry. Never materialized.
    Symlink,

    /// Hard link entry. Never materialized.
    Hardlink,

    /// Entry without file content (device node, FIFO, metadata header).
    Other,
}

impl EntryType {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` if this is a symlink or hardlink.
    #[must_use]
    pub const fn is_link(self) -> bool {
        matches!(self, Self::Symlink | Self::Hardlink)
    }

    /// Returns a short name for logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Hardlink => "hardlink",
            Self::Other => "special",
        }
    }
}
