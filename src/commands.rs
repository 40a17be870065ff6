use crate::{OutputMode, emit_success};
use bookdb::config::{self, BookdbConfig, SortOrder};
use bookdb::menu::Menu;
use bookdb::ui::{self, Icons, books_table, header, success, summary_row, warn};
use bookdb::{BookRecord, Error, Isbn13, RecordStore};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Settings shared by every command that touches the database file
pub struct Context {
    pub database: PathBuf,
    pub lenient: bool,
    pub output_mode: OutputMode,
}

impl Context {
    /// Load the database, strictly or skipping malformed lines.
    ///
    /// Skipped lines are returned for reporting; the store keeps them and
    /// writes them back on save.
    pub fn open_store(&self) -> anyhow::Result<(RecordStore, Vec<Error>)> {
        if !self.lenient {
            return Ok((RecordStore::load(&self.database)?, Vec::new()));
        }

        let (store, skipped) = RecordStore::load_lenient(&self.database)?;
        if self.output_mode.is_human() && !skipped.is_empty() {
            warn(&format!(
                "Skipped {} malformed line(s) in {} (kept in the file)",
                skipped.len(),
                self.database.display()
            ));
        }
        Ok((store, skipped))
    }
}

pub fn run_menu(ctx: &Context, sort: SortOrder) -> anyhow::Result<()> {
    let (mut store, _) = ctx.open_store()?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Menu::new(&mut store, &ctx.database, sort, stdin.lock(), stdout.lock()).run()?;
    Ok(())
}

pub fn run_add(ctx: &Context, title: &str, writer: &str, isbn: &str, year: &str) -> anyhow::Result<()> {
    let record = BookRecord::from_input(title, writer, isbn, year)?;
    let (mut store, skipped) = ctx.open_store()?;
    if store.contains(record.isbn13()) {
        anyhow::bail!(
            "a book with ISBN-13 {} already exists in {}",
            record.isbn13(),
            ctx.database.display()
        );
    }

    store.add(record.clone());
    store.save(&ctx.database)?;
    tracing::info!("New book '{}' added to {}", record, ctx.database.display());

    if ctx.output_mode.is_human() {
        success(&format!("New book '{}' successfully added to the database", record));
    } else {
        emit_success(ctx.output_mode, "add", serde_json::to_value(&record)?, &skipped)?;
    }
    Ok(())
}

pub fn run_remove(ctx: &Context, isbn: &str) -> anyhow::Result<()> {
    let isbn13 = Isbn13::normalize(isbn)?;
    let (mut store, skipped) = ctx.open_store()?;
    let removed = store.remove(&isbn13)?;
    store.save(&ctx.database)?;
    tracing::info!("Book '{}' removed from {}", removed, ctx.database.display());

    if ctx.output_mode.is_human() {
        println!(
            "{} {}",
            Icons::DEL.style(ui::theme().error.clone()),
            format!("Removed '{}'", removed).style(ui::theme().success.clone())
        );
    } else {
        emit_success(ctx.output_mode, "remove", serde_json::to_value(&removed)?, &skipped)?;
    }
    Ok(())
}

pub fn run_find(ctx: &Context, isbn: &str) -> anyhow::Result<()> {
    let isbn13 = Isbn13::normalize(isbn)?;
    let (store, skipped) = ctx.open_store()?;
    let record = store.find(&isbn13)?;

    if ctx.output_mode.is_human() {
        println!(
            "{} {}",
            Icons::SEARCH,
            record.title().to_uppercase().style(ui::theme().title.clone())
        );
        summary_row("Writer:", record.writer());
        summary_row("ISBN-13:", record.isbn13().as_str());
        summary_row("Year:", &record.year().to_string());
    } else {
        emit_success(ctx.output_mode, "find", serde_json::to_value(record)?, &skipped)?;
    }
    Ok(())
}

pub fn run_list(ctx: &Context, sort: SortOrder) -> anyhow::Result<()> {
    let (store, skipped) = ctx.open_store()?;
    let books: Vec<&BookRecord> = match sort {
        SortOrder::Year => store.sorted_by_year(),
        SortOrder::Insertion => store.list().iter().collect(),
    };

    if !ctx.output_mode.is_human() {
        return emit_success(ctx.output_mode, "list", serde_json::to_value(&books)?, &skipped);
    }

    if books.is_empty() {
        ui::info("Database", "doesn't contain any books");
        return Ok(());
    }

    let order = match sort {
        SortOrder::Year => "sorted by year",
        SortOrder::Insertion => "file order",
    };
    header(&format!("Books in '{}' ({})", ctx.database.display(), order));
    println!("{}", books_table(books.iter().copied()));
    summary_row("Total:", &books.len().to_string());
    Ok(())
}

pub fn run_init_config(
    output_mode: OutputMode,
    path: &Path,
    effective: &BookdbConfig,
    force: bool,
) -> anyhow::Result<()> {
    config::write_config(path, effective, force)?;

    if output_mode.is_human() {
        success(&format!("Wrote {}", path.display()));
        if let Some(database) = &effective.database {
            summary_row(&format!("{} database =", Icons::DATABASE), database);
        }
    } else {
        let data = serde_json::json!({
            "path": path.display().to_string(),
            "config": effective,
        });
        emit_success(output_mode, "init-config", data, &[])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_context(database: PathBuf, lenient: bool) -> Context {
        Context {
            database,
            lenient,
            output_mode: OutputMode::Json,
        }
    }

    #[test]
    fn test_add_refuses_duplicate_isbn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.txt");
        std::fs::write(&path, "Dune/Frank Herbert/9780441172719/1965\n").unwrap();
        let ctx = json_context(path.clone(), false);

        let err = run_add(&ctx, "Copy", "J", "978-0-441-17271-9", "2020").unwrap_err();

        assert!(err.to_string().contains("already exists"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Dune/Frank Herbert/9780441172719/1965\n"
        );
    }

    #[test]
    fn test_add_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.txt");
        let ctx = json_context(path.clone(), false);

        run_add(&ctx, "Dune", "Frank Herbert", "9780441172719", "1965").unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Dune/Frank Herbert/9780441172719/1965\n"
        );

        run_remove(&ctx, "9780441172719").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        assert!(run_find(&ctx, "9780441172719").is_err());
    }

    #[test]
    fn test_lenient_add_keeps_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.txt");
        std::fs::write(&path, "Good/J/1234567890123/2000\nBroken line/J\n").unwrap();
        let ctx = json_context(path.clone(), true);

        let (_, skipped) = ctx.open_store().unwrap();
        assert_eq!(skipped.len(), 1);

        run_add(&ctx, "Dune", "Herbert", "9780441172719", "1965").unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Good/J/1234567890123/2000\nBroken line/J\nDune/Herbert/9780441172719/1965\n"
        );
    }
}
