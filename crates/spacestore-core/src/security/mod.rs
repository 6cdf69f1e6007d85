//! Per-entry security validation.

pub mod path;

pub use path::SafeEntry;
pub use path::validate_entry;
