//! Line format definitions
//!
//! One record per line, four fields separated by `/`. Fields are trimmed when
//! read; blank lines carry no record.

use crate::book::{BookRecord, PublishingYear};
use crate::isbn::Isbn13;
use crate::{Error, Result};

/// Field separator within a line
pub const SEPARATOR: char = '/';

/// Number of fields in a record line
pub const FIELD_COUNT: usize = 4;

/// Serialize a record as a single line (without the trailing newline)
pub fn encode_line(record: &BookRecord) -> String {
    format!(
        "{title}{sep}{writer}{sep}{isbn}{sep}{year}",
        title = record.title(),
        writer = record.writer(),
        isbn = record.isbn13(),
        year = record.year(),
        sep = SEPARATOR,
    )
}

/// Split a line into trimmed fields, or `None` if the line is blank
pub fn split_fields(line: &str) -> Option<Vec<&str>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(line.split(SEPARATOR).map(str::trim).collect())
}

/// Decode one line, requiring exactly four fields.
///
/// `line_no` is 1-based and only used for error reporting.
pub fn decode_line(line: &str, line_no: usize) -> Result<Option<BookRecord>> {
    let Some(fields) = split_fields(line) else {
        return Ok(None);
    };
    if fields.len() != FIELD_COUNT {
        return Err(field_count_error(fields.len(), line_no));
    }
    decode_fields(&fields, line_no).map(Some)
}

/// Decode the first four fields of a split line.
///
/// Only the ISBN and year are checked; any title or writer is accepted.
pub fn decode_fields(fields: &[&str], line_no: usize) -> Result<BookRecord> {
    let [title, writer, isbn, year] = fields else {
        return Err(field_count_error(fields.len(), line_no));
    };
    let isbn13 = Isbn13::parse(isbn).map_err(|e| e.at_line(line_no))?;
    let year = PublishingYear::parse(year).map_err(|e| e.at_line(line_no))?;
    Ok(BookRecord::from_line_fields(title, writer, isbn13, year))
}

pub(crate) fn field_count_error(found: usize, line_no: usize) -> Error {
    Error::Parse {
        line: line_no,
        reason: format!("expected {} fields, found {}", FIELD_COUNT, found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_line() {
        let book = BookRecord::from_input("Test Book", "J", "1234567890123", "2000").unwrap();
        assert_eq!(encode_line(&book), "Test Book/J/1234567890123/2000");
    }

    #[test]
    fn test_decode_trims_fields() {
        let book = decode_line("  Test Book / J /1234567890123/ 2020\r", 1).unwrap().unwrap();
        assert_eq!(book.title(), "Test Book");
        assert_eq!(book.writer(), "J");
        assert_eq!(book.year().value(), 2020);
    }

    #[test]
    fn test_decode_blank_line() {
        assert!(decode_line("", 1).unwrap().is_none());
        assert!(decode_line("   \t", 1).unwrap().is_none());
    }

    #[test]
    fn test_decode_wrong_field_count() {
        match decode_line("Test Book Invalid One/J", 3) {
            Err(Error::Parse { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("found 2"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(matches!(
            decode_line("A/B/1234567890125/2000/extra", 1),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_decode_invalid_values() {
        assert!(matches!(
            decode_line("Invalid Two/J/123456789012A/2000", 4),
            Err(Error::Parse { line: 4, .. })
        ));
        assert!(matches!(
            decode_line("Invalid Three/J/1234567890125/Test", 5),
            Err(Error::Parse { line: 5, .. })
        ));
    }

    #[test]
    fn test_decode_accepts_any_stored_text() {
        let long_title = "x".repeat(101);
        let line = format!("{}/J/1234567890123/2000", long_title);
        let book = decode_line(&line, 1).unwrap().unwrap();
        assert_eq!(book.title(), long_title);
        assert_eq!(encode_line(&book), line);

        let book = decode_line("/J/1234567890125/2000", 2).unwrap().unwrap();
        assert_eq!(book.title(), "");
        assert_eq!(encode_line(&book), "/J/1234567890125/2000");
    }
}
