//! Storage Layer - flat text file persistence
//!
//! The system of record is a plain text file, one book per line:
//! - `Title/Writer/ISBN-13/Publishing-year`
//!
//! The whole file is read on load and rewritten on save.

pub mod format;
pub mod store;

pub use store::RecordStore;
