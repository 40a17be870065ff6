//! # bookdb - Flat-file book database
//!
//! Manages a plain text file of book records, one per line:
//!
//! ```text
//! Title/Writer/ISBN-13/Publishing-year
//! ```
//!
//! bookdb provides:
//! - Validated record types (`Isbn13`, `PublishingYear`, `BookRecord`)
//! - A line codec for the `/`-delimited format
//! - An in-memory `RecordStore` with load / add / remove / find / list / save
//! - An interactive menu and a themed terminal UI for the CLI

pub mod isbn;
pub mod book;
pub mod storage;
pub mod config;
pub mod menu;
pub mod ui;

// Re-exports for convenient access
pub use isbn::Isbn13;
pub use book::{BookRecord, PublishingYear};
pub use storage::RecordStore;

/// Result type alias for bookdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bookdb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Book not found: ISBN-13 {0}")]
    NotFound(Isbn13),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attach a line number to a field validation error raised while parsing a file.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            Error::InvalidRecord(reason) => Error::Parse { line, reason },
            other => other,
        }
    }
}
