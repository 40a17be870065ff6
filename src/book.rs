//! Book records
//!
//! A record is `{title, writer, isbn13, year}`. New records are validated on
//! construction; records decoded from the database file keep whatever title
//! and writer the line held. Either way a `BookRecord` can always be written
//! back to the file without corrupting the line format.

use crate::isbn::Isbn13;
use crate::storage::format::SEPARATOR;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a title or writer, in characters
pub const MAX_TEXT_LEN: usize = 100;

/// A plausible four-digit publishing year (`1000..=9999`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct PublishingYear(u16);

impl PublishingYear {
    pub const MIN: u16 = 1000;
    pub const MAX: u16 = 9999;

    pub fn new(year: u16) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&year) {
            return Err(Error::InvalidRecord(format!(
                "Year must be exactly 4 digits, got {}",
                year
            )));
        }
        Ok(Self(year))
    }

    /// Parse a year written as exactly four ASCII digits
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidRecord(format!(
                "Year must be exactly 4 digits, got '{}'",
                s
            )));
        }
        let year: u16 = s
            .parse()
            .map_err(|_| Error::InvalidRecord(format!("Invalid year: '{}'", s)))?;
        Self::new(year)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for PublishingYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PublishingYear {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<u16> for PublishingYear {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PublishingYear> for u16 {
    fn from(year: PublishingYear) -> Self {
        year.0
    }
}

/// A single book in the database.
///
/// Fields are private so every record either passed `BookRecord::new` or came
/// from a decoded file line; both guarantee the text fields hold no separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBookRecord")]
pub struct BookRecord {
    title: String,
    writer: String,
    isbn13: Isbn13,
    year: PublishingYear,
}

/// Unvalidated shape of a deserialized record
#[derive(Deserialize)]
struct RawBookRecord {
    title: String,
    writer: String,
    isbn13: Isbn13,
    year: PublishingYear,
}

impl TryFrom<RawBookRecord> for BookRecord {
    type Error = Error;

    fn try_from(raw: RawBookRecord) -> Result<Self> {
        Self::new(raw.title, raw.writer, raw.isbn13, raw.year)
    }
}

impl BookRecord {
    /// Create a new record, trimming and validating the text fields
    pub fn new(
        title: impl AsRef<str>,
        writer: impl AsRef<str>,
        isbn13: Isbn13,
        year: PublishingYear,
    ) -> Result<Self> {
        Ok(Self {
            title: validate_text("Title", title.as_ref())?,
            writer: validate_text("Writer", writer.as_ref())?,
            isbn13,
            year,
        })
    }

    /// Build a record from raw user input (hyphenated ISBNs accepted)
    pub fn from_input(title: &str, writer: &str, isbn: &str, year: &str) -> Result<Self> {
        Self::new(
            title,
            writer,
            Isbn13::normalize(isbn)?,
            PublishingYear::parse(year.trim())?,
        )
    }

    /// Build a record from the text fields of a database line.
    ///
    /// The line splitter already guarantees no separator or line break, and
    /// stored titles and writers are accepted whatever their length.
    pub(crate) fn from_line_fields(
        title: &str,
        writer: &str,
        isbn13: Isbn13,
        year: PublishingYear,
    ) -> Self {
        debug_assert!(!title.contains(SEPARATOR) && !writer.contains(SEPARATOR));
        Self {
            title: title.trim().to_string(),
            writer: writer.trim().to_string(),
            isbn13,
            year,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn writer(&self) -> &str {
        &self.writer
    }

    pub fn isbn13(&self) -> &Isbn13 {
        &self.isbn13
    }

    pub fn year(&self) -> PublishingYear {
        self.year
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) by {} [ISBN-13: {}]",
            self.title.to_uppercase(),
            self.year,
            self.writer,
            self.isbn13
        )
    }
}

/// Validate a title or writer and return it trimmed
pub fn validate_text(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidRecord(format!("'{}' cannot be empty", field)));
    }
    let len = value.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(Error::InvalidRecord(format!(
            "'{}' is too long, max length: {} characters",
            field, MAX_TEXT_LEN
        )));
    }
    if value.contains(SEPARATOR) || value.contains(['\n', '\r']) {
        return Err(Error::InvalidRecord(format!(
            "'{}' cannot contain '{}' or line breaks",
            field, SEPARATOR
        )));
    }
    Ok(value.to_string())
}
