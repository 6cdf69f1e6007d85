//! Type-safe wrappers for archive extraction operations.
//!
//! These newtypes enforce path validation at the type level: an archive
//! entry name can only reach the filesystem as a [`SafePath`] joined onto a
//! [`DestDir`].

pub mod dest_dir;
pub mod entry_type;
pub mod safe_path;

pub use dest_dir::DestDir;
pub use entry_type::EntryType;
pub use safe_path::SafePath;
