//! Archive format detection and readers.

pub mod detect;
pub mod tar;
pub mod traits;
pub mod zip;

// Re-export main types for convenience
pub use self::detect::ArchiveType;
pub use self::detect::detect_format;
pub use self::tar::TarReader;
pub use self::traits::ArchiveEntry;
pub use self::traits::ArchiveReader;
pub use self::traits::open_reader;
pub use self::zip::ZipReader;
