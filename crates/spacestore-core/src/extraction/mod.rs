//! Archive extraction: per-entry validation, streaming writes and an atomic
//! commit into the target directory.

pub mod atomic;
pub mod engine;
pub mod stream;

pub use engine::ExtractionEngine;
