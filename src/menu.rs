//! Interactive menu
//!
//! The default front-end when the CLI is started with just a database file:
//!
//! ```text
//! ***************
//! 1) Add new book
//! 2) Print current database contents
//! Q) Exit program
//! ***************
//! ```
//!
//! Reads from any `BufRead` and writes to any `Write`, so it runs the same
//! against a terminal or in-memory buffers.

use std::io::{BufRead, Write};
use std::path::Path;
use crate::book::{validate_text, BookRecord, PublishingYear};
use crate::config::SortOrder;
use crate::isbn::Isbn13;
use crate::storage::RecordStore;
use crate::{Error, Result};

pub const MENU_BORDER: &str = "***************";

/// A selection from the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Add,
    List,
    Quit,
}

impl MenuCommand {
    /// Parse a menu selection (trimmed, case-insensitive)
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_uppercase().as_str() {
            "1" => Some(MenuCommand::Add),
            "2" => Some(MenuCommand::List),
            "Q" => Some(MenuCommand::Quit),
            _ => None,
        }
    }
}

pub struct Menu<'a, R, W> {
    store: &'a mut RecordStore,
    path: &'a Path,
    sort: SortOrder,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a mut RecordStore, path: &'a Path, sort: SortOrder, input: R, out: W) -> Self {
        Self { store, path, sort, input, out }
    }

    /// Run until the user quits or input ends
    pub fn run(&mut self) -> Result<()> {
        tracing::debug!("Menu started with {} existing book(s)", self.store.len());
        loop {
            self.print_menu()?;
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(selection) = self.read_line()? else {
                break;
            };

            match MenuCommand::parse(&selection) {
                Some(MenuCommand::Add) => {
                    if !self.add_book()? {
                        break;
                    }
                }
                Some(MenuCommand::List) => self.list_books()?,
                Some(MenuCommand::Quit) => break,
                None => {
                    let command = selection.trim().to_uppercase();
                    tracing::warn!("Unknown command: {}", command);
                    writeln!(self.out, "Unknown command: {}, please try again", command)?;
                }
            }
        }
        tracing::debug!("Exiting menu");
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.out, "{}", MENU_BORDER)?;
        writeln!(self.out, "1) Add new book")?;
        writeln!(self.out, "2) Print current database contents")?;
        writeln!(self.out, "Q) Exit program")?;
        writeln!(self.out, "{}", MENU_BORDER)?;
        Ok(())
    }

    /// Collect a new book and add it if confirmed. Returns `false` if input ended.
    fn add_book(&mut self) -> Result<bool> {
        writeln!(self.out, "*** Add New Book ***")?;

        let Some(title) = self.prompt_valid("Title: ", |v| validate_text("Title", v))? else {
            return Ok(false);
        };
        let Some(writer) = self.prompt_valid("Writer: ", |v| validate_text("Writer", v))? else {
            return Ok(false);
        };
        let Some(isbn13) = self.prompt_isbn()? else {
            return Ok(false);
        };
        let Some(year) = self.prompt_valid("Publishing Year: ", PublishingYear::parse)? else {
            return Ok(false);
        };

        let book = BookRecord::new(title, writer, isbn13, year)?;
        writeln!(self.out, "\nDetails:")?;
        writeln!(
            self.out,
            "\tTitle: {}\n\tWriter: {}\n\tISBN-13: {}\n\tPublishing year: {}",
            book.title(),
            book.writer(),
            book.isbn13(),
            book.year()
        )?;

        loop {
            write!(self.out, "\nDo you want to add this book to the database (Y/N): ")?;
            self.out.flush()?;
            let Some(answer) = self.read_line()? else {
                return Ok(false);
            };
            match answer.trim().to_uppercase().as_str() {
                "Y" => {
                    let message = format!("New book '{}' successfully added to the database", book);
                    let mut updated = self.store.clone();
                    updated.add(book);
                    updated.save(self.path)?;
                    *self.store = updated;
                    tracing::info!("{}", message);
                    writeln!(self.out, "{}", message)?;
                    return Ok(true);
                }
                "N" => return Ok(true),
                _ => writeln!(self.out, "Invalid choice. Please enter Y or N")?,
            }
        }
    }

    fn list_books(&mut self) -> Result<()> {
        writeln!(self.out)?;
        if self.store.is_empty() {
            writeln!(self.out, "Database doesn't contain any books")?;
            return Ok(());
        }

        let books: Vec<&BookRecord> = match self.sort {
            SortOrder::Year => {
                writeln!(self.out, "Books in '{}' (sorted by year):", self.path.display())?;
                self.store.sorted_by_year()
            }
            SortOrder::Insertion => {
                writeln!(self.out, "Books in '{}':", self.path.display())?;
                self.store.list().iter().collect()
            }
        };
        for book in books {
            writeln!(self.out, "\t{}", book)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// Prompt for an ISBN, also refusing one that is already in the database
    fn prompt_isbn(&mut self) -> Result<Option<Isbn13>> {
        loop {
            let Some(isbn13) = self.prompt_valid("ISBN-13: ", Isbn13::normalize)? else {
                return Ok(None);
            };
            if !self.store.contains(&isbn13) {
                return Ok(Some(isbn13));
            }
            writeln!(self.out, "A book with ISBN-13 {} already exists", isbn13)?;
        }
    }

    /// Re-prompt until `parse` accepts the input. `None` means input ended.
    fn prompt_valid<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T>,
    ) -> Result<Option<T>> {
        let field = prompt.trim_end().trim_end_matches(':');
        loop {
            write!(self.out, "{}", prompt)?;
            self.out.flush()?;
            let Some(value) = self.read_line()? else {
                return Ok(None);
            };
            if value.trim().is_empty() {
                writeln!(self.out, "'{}' cannot be empty, please try again", field)?;
                continue;
            }
            match parse(value.trim()) {
                Ok(parsed) => return Ok(Some(parsed)),
                Err(Error::InvalidRecord(reason)) => writeln!(self.out, "{}", reason)?,
                Err(other) => return Err(other),
            }
        }
    }

    /// Read one line without its terminator; `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_menu(store: &mut RecordStore, path: &Path, script: &str) -> String {
        let mut out = Vec::new();
        Menu::new(store, path, SortOrder::Year, Cursor::new(script.to_string()), &mut out)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(MenuCommand::parse(" 1 "), Some(MenuCommand::Add));
        assert_eq!(MenuCommand::parse("2"), Some(MenuCommand::List));
        assert_eq!(MenuCommand::parse("q"), Some(MenuCommand::Quit));
        assert_eq!(MenuCommand::parse("3"), None);
    }

    #[test]
    fn test_add_confirmed_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.txt");
        let mut store = RecordStore::load(&path).unwrap();

        let output = run_menu(&mut store, &path, "1\nTest Book\nJ\n123-456-78901-2-3\n2020\ny\nq\n");

        assert!(output.contains("successfully added"));
        assert_eq!(store.len(), 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Test Book/J/1234567890123/2020\n"
        );
    }

    #[test]
    fn test_add_reprompts_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.txt");
        let mut store = RecordStore::new();

        let script = "1\n\nTest Book\nJ\n12345\n1234567890123\n99\n2020\nmaybe\nY\nQ\n";
        let output = run_menu(&mut store, &path, script);

        assert!(output.contains("'Title' cannot be empty"));
        assert!(output.contains("ISBN-13 must contain exactly 13 digits"));
        assert!(output.contains("Year must be exactly 4 digits"));
        assert!(output.contains("Invalid choice. Please enter Y or N"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_declined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.txt");
        let mut store = RecordStore::new();

        run_menu(&mut store, &path, "1\nTest Book\nJ\n1234567890123\n2020\nn\nq\n");

        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_unknown_command_and_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.txt");
        let mut store = RecordStore::new();

        let output = run_menu(&mut store, &path, "x\n2\n");

        assert!(output.contains("Unknown command: X, please try again"));
        assert!(output.contains("Database doesn't contain any books"));
    }

    #[test]
    fn test_list_sorted_by_year() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.txt");
        let mut store = RecordStore::parse(
            "Newer/J/1234567890123/2025\nOlder/J/1234567890124/1990\n",
        )
        .unwrap();

        let output = run_menu(&mut store, &path, "2\nq\n");

        let older = output.find("OLDER (1990)").unwrap();
        let newer = output.find("NEWER (2025)").unwrap();
        assert!(older < newer);
    }

    #[test]
    fn test_add_refuses_existing_isbn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.txt");
        let mut store = RecordStore::parse("Dune/Frank Herbert/9780441172719/1965\n").unwrap();

        let script = "1\nCopy\nJ\n978-0-441-17271-9\n1234567890123\n2020\ny\nq\n";
        let output = run_menu(&mut store, &path, script);

        let refused = output.find("A book with ISBN-13 9780441172719 already exists").unwrap();
        let reprompt = output[refused..].find("ISBN-13: ");
        assert!(reprompt.is_some());
        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[1].isbn13().as_str(), "1234567890123");
    }

    #[test]
    fn test_failed_save_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("books.txt");
        let mut store = RecordStore::new();
        let mut out = Vec::new();

        let result = Menu::new(
            &mut store,
            &path,
            SortOrder::Year,
            Cursor::new("1\nTest Book\nJ\n1234567890123\n2020\ny\n".to_string()),
            &mut out,
        )
        .run();

        assert!(matches!(result, Err(Error::Io(_))));
        assert!(store.is_empty());
    }
}
