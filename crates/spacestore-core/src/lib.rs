//! Tenant-scoped upload storage with safe archive extraction.
//!
//! `spacestore-core` maps API keys to tenant directories and extracts
//! uploaded ZIP and TAR archives into them. Every entry name is sanitized
//! against the target directory before anything touches the filesystem, and
//! an archive containing a single escaping or link entry is rejected as a
//! whole.
//!
//! # Examples
//!
//! ```no_run
//! use spacestore_core::KeyMap;
//! use spacestore_core::detect_format;
//! use spacestore_core::extract_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let keys = KeyMap::load("api_keys.json")?;
//! let tenant = keys.resolve("my-key").ok_or("unknown key")?;
//! let tenant_dir = tenant.dir_in(std::path::Path::new("uploads"));
//!
//! if let Some(archive_type) = detect_format("report.zip") {
//!     let report = extract_archive(tenant_dir.join("report.zip"), archive_type, &tenant_dir)?;
//!     println!("Extracted {} files", report.files_extracted);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod report;
pub mod security;
pub mod tenant;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::extract_archive;
pub use error::ConfigError;
pub use error::ExtractionError;
pub use error::Result;
pub use formats::ArchiveType;
pub use formats::detect_format;
pub use report::ExtractionReport;
pub use tenant::KeyMap;
pub use tenant::TenantRoot;

// Re-export types module for easier access
pub use types::DestDir;
pub use types::EntryType;
pub use types::SafePath;
