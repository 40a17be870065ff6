//! In-memory record store backed by a flat text file

use std::fs::OpenOptions;
use std::path::Path;
use crate::book::BookRecord;
use crate::isbn::Isbn13;
use crate::{Error, Result};
use super::format::{self, FIELD_COUNT};

/// Position of one non-blank line of the database file
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    /// The next record in `records`. `raw` keeps the original text of a line
    /// that had more than four fields, so saving doesn't drop the extras.
    Record { raw: Option<String> },
    /// A malformed line skipped by the lenient loader, written back verbatim
    Preserved(String),
}

/// Ordered collection of book records.
///
/// Records keep insertion order. ISBNs are not required to be unique;
/// `find` and `remove` act on the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<BookRecord>,
    /// File order of records and preserved lines; the n-th `Slot::Record`
    /// belongs to `records[n]`.
    slots: Vec<Slot>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a database file, creating it empty if it doesn't exist.
    ///
    /// Fails with `Error::Parse` on the first malformed line.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_or_create(path)?;
        let store = Self::parse(&contents)?;
        tracing::debug!("Loaded {} book(s) from {}", store.len(), path.display());
        Ok(store)
    }

    /// Load a database file, skipping malformed lines instead of failing.
    ///
    /// The skipped lines are returned as `Error::Parse` values in file order.
    /// They stay in the store and are written back unchanged by `save`.
    pub fn load_lenient(path: &Path) -> Result<(Self, Vec<Error>)> {
        let contents = read_or_create(path)?;
        let (store, skipped) = Self::parse_lenient(&contents);
        for err in &skipped {
            tracing::warn!("{}: {}, ignoring", path.display(), err);
        }
        tracing::debug!(
            "Loaded {} book(s) from {} ({} line(s) skipped)",
            store.len(),
            path.display(),
            skipped.len()
        );
        Ok((store, skipped))
    }

    /// Parse database text, failing on the first malformed line
    pub fn parse(text: &str) -> Result<Self> {
        let mut store = Self::new();
        for (idx, line) in text.lines().enumerate() {
            if let Some(record) = format::decode_line(line, idx + 1)? {
                store.add(record);
            }
        }
        Ok(store)
    }

    /// Parse database text, collecting malformed lines instead of failing.
    ///
    /// Lines with more than four fields keep the first four as the record.
    pub fn parse_lenient(text: &str) -> (Self, Vec<Error>) {
        let mut store = Self::new();
        let mut skipped = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let Some(fields) = format::split_fields(line) else {
                continue;
            };
            if fields.len() < FIELD_COUNT {
                skipped.push(format::field_count_error(fields.len(), line_no));
                store.slots.push(Slot::Preserved(line.to_string()));
                continue;
            }
            match format::decode_fields(&fields[..FIELD_COUNT], line_no) {
                Ok(record) => {
                    let raw = if fields.len() > FIELD_COUNT {
                        tracing::warn!(
                            "Line {} has {} fields, only first {} are used",
                            line_no,
                            fields.len(),
                            FIELD_COUNT
                        );
                        Some(line.to_string())
                    } else {
                        None
                    };
                    store.records.push(record);
                    store.slots.push(Slot::Record { raw });
                }
                Err(e) => {
                    skipped.push(e);
                    store.slots.push(Slot::Preserved(line.to_string()));
                }
            }
        }

        (store, skipped)
    }

    /// Serialize the store, one `\n`-terminated line each.
    ///
    /// Records are re-encoded with trimmed fields; lines kept by the lenient
    /// loader are written as they were read. Blank lines are dropped, CRLF
    /// line endings become `\n`, and the last line always gets a terminator,
    /// so only trimmed, `\n`-terminated files without blank lines render back
    /// byte for byte.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut records = self.records.iter();
        for slot in &self.slots {
            match slot {
                Slot::Record { raw: Some(raw) } => {
                    records.next();
                    out.push_str(raw);
                }
                Slot::Record { raw: None } => {
                    if let Some(record) = records.next() {
                        out.push_str(&format::encode_line(record));
                    }
                }
                Slot::Preserved(line) => out.push_str(line),
            }
            out.push('\n');
        }
        out
    }

    /// Overwrite the database file with the current contents
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())?;
        tracing::debug!("Saved {} book(s) to {}", self.len(), path.display());
        Ok(())
    }

    /// Append a record
    pub fn add(&mut self, record: BookRecord) {
        tracing::debug!("Adding book {}", record);
        self.records.push(record);
        self.slots.push(Slot::Record { raw: None });
    }

    /// Remove the first record with the given ISBN
    pub fn remove(&mut self, isbn13: &Isbn13) -> Result<BookRecord> {
        let pos = self
            .position(isbn13)
            .ok_or_else(|| Error::NotFound(isbn13.clone()))?;
        let slot = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| matches!(slot, Slot::Record { .. }))
            .nth(pos)
            .map(|(idx, _)| idx);
        if let Some(slot) = slot {
            self.slots.remove(slot);
        }
        let removed = self.records.remove(pos);
        tracing::debug!("Removed book {}", removed);
        Ok(removed)
    }

    /// Find the first record with the given ISBN
    pub fn find(&self, isbn13: &Isbn13) -> Result<&BookRecord> {
        self.records
            .iter()
            .find(|r| r.isbn13() == isbn13)
            .ok_or_else(|| Error::NotFound(isbn13.clone()))
    }

    /// All records in insertion order
    pub fn list(&self) -> &[BookRecord] {
        &self.records
    }

    /// All records ordered by publishing year; equal years keep insertion order
    pub fn sorted_by_year(&self) -> Vec<&BookRecord> {
        let mut sorted: Vec<&BookRecord> = self.records.iter().collect();
        sorted.sort_by_key(|r| r.year());
        sorted
    }

    pub fn contains(&self, isbn13: &Isbn13) -> bool {
        self.position(isbn13).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of malformed lines carried through from a lenient load
    pub fn preserved_lines(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Preserved(_)))
            .count()
    }

    fn position(&self, isbn13: &Isbn13) -> Option<usize> {
        self.records.iter().position(|r| r.isbn13() == isbn13)
    }
}

/// Read the whole file, creating an empty one first if it's missing
fn read_or_create(path: &Path) -> Result<String> {
    if !path.exists() {
        OpenOptions::new().write(true).create_new(true).open(path)?;
        tracing::info!("New library database created: {}", path.display());
        return Ok(String::new());
    }
    Ok(std::fs::read_to_string(path)?)
}
