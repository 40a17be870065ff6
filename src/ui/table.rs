use crate::book::BookRecord;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct BookRow {
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Writer")]
    pub writer: String,
    #[tabled(rename = "ISBN-13")]
    pub isbn13: String,
    #[tabled(rename = "Year")]
    pub year: u16,
}

impl From<&BookRecord> for BookRow {
    fn from(record: &BookRecord) -> Self {
        Self {
            title: record.title().to_string(),
            writer: record.writer().to_string(),
            isbn13: record.isbn13().to_string(),
            year: record.year().value(),
        }
    }
}

/// Render records as a rounded table, or an empty string when there are none
pub fn books_table<'a>(records: impl IntoIterator<Item = &'a BookRecord>) -> String {
    let rows: Vec<BookRow> = records.into_iter().map(BookRow::from).collect();
    if rows.is_empty() {
        return String::new();
    }

    Table::new(&rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table() {
        assert_eq!(books_table(Vec::<&BookRecord>::new()), "");
    }

    #[test]
    fn test_table_contains_fields() {
        let book = BookRecord::from_input("Dune", "Frank Herbert", "9780441172719", "1965").unwrap();
        let table = books_table([&book]);
        assert!(table.contains("ISBN-13"));
        assert!(table.contains("Frank Herbert"));
        assert!(table.contains("9780441172719"));
        assert!(table.contains("1965"));
    }
}
