//! bookdb CLI - Command-line interface for the flat-file book database

mod commands;

use bookdb::config::{self, BookdbConfig, SortOrder};
use bookdb::ui;
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bookdb")]
#[command(version)]
#[command(about = "Flat-file book database - manage /-delimited book records")]
#[command(long_about = r#"
bookdb keeps book records in a plain text file, one per line:

  Title/Writer/ISBN-13/Publishing-year

Run with only a file to open the interactive menu, or use a command:
  bookdb books.txt
  bookdb books.txt add --title "Dune" --writer "Frank Herbert" --isbn 9780441172719 --year 1965
  bookdb books.txt find 9780441172719
  bookdb books.txt list --sort insertion
"#)]
struct Cli {
    /// Database file for the book records (created if missing)
    file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file (defaults to ./bookdb.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip malformed lines instead of failing to load
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new book
    Add {
        /// Book title
        #[arg(short, long)]
        title: String,

        /// Book writer
        #[arg(short, long)]
        writer: String,

        /// ISBN-13 (hyphens allowed)
        #[arg(short, long)]
        isbn: String,

        /// Four-digit publishing year
        #[arg(short, long)]
        year: String,
    },

    /// Remove the first book with the given ISBN-13
    Remove {
        /// ISBN-13 (hyphens allowed)
        isbn: String,
    },

    /// Find a book by ISBN-13
    Find {
        /// ISBN-13 (hyphens allowed)
        isbn: String,
    },

    /// List all books
    List {
        /// Listing order (defaults to the config value, then year)
        #[arg(short, long, value_enum)]
        sort: Option<SortOrder>,
    },

    /// Write a config file with the current settings
    InitConfig {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

/// How results are reported on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// JSON result envelope for a successful command.
///
/// `skipped` lists the malformed lines a lenient load passed over.
pub fn success_envelope(
    command: &str,
    data: serde_json::Value,
    skipped: &[bookdb::Error],
) -> serde_json::Value {
    let skipped: Vec<serde_json::Value> = skipped
        .iter()
        .map(|err| match err {
            bookdb::Error::Parse { line, reason } => serde_json::json!({
                "line": line,
                "reason": reason,
            }),
            other => serde_json::json!({ "reason": other.to_string() }),
        })
        .collect();
    serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
        "skipped": skipped,
    })
}

fn error_envelope(err: &anyhow::Error) -> serde_json::Value {
    serde_json::json!({
        "ok": false,
        "error": format!("{:#}", err),
    })
}

/// Print a successful JSON result envelope
pub fn emit_success(
    output_mode: OutputMode,
    command: &str,
    data: serde_json::Value,
    skipped: &[bookdb::Error],
) -> anyhow::Result<()> {
    if output_mode.is_human() {
        return Ok(());
    }
    let envelope = success_envelope(command, data, skipped);
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn emit_error(output_mode: OutputMode, err: &anyhow::Error) {
    if output_mode.is_human() {
        ui::error(&format!("{:#}", err));
        return;
    }
    println!("{}", error_envelope(err));
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let (file_layer, stderr_layer) = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer().with_writer(Mutex::new(file)).with_ansi(false);
            (Some(layer), None)
        }
        None => (None, Some(fmt::layer().with_writer(std::io::stderr))),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

fn run(cli: Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    let settings = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    init_logging(cli.verbose, settings.log_file.as_deref().map(Path::new))?;
    tracing::debug!("Application started");

    let database = cli
        .file
        .clone()
        .or_else(|| settings.database.as_deref().map(PathBuf::from));
    let lenient = cli.lenient || settings.lenient.unwrap_or(false);

    let context = || -> anyhow::Result<commands::Context> {
        let Some(database) = database.clone() else {
            anyhow::bail!("no database file given (pass FILE or set `database` in bookdb.toml)");
        };
        Ok(commands::Context {
            database,
            lenient,
            output_mode,
        })
    };

    match cli.command {
        None => {
            if !output_mode.is_human() {
                anyhow::bail!("the interactive menu is not available with --json");
            }
            commands::run_menu(&context()?, settings.sort.unwrap_or_default())
        }
        Some(Commands::Add { title, writer, isbn, year }) => {
            commands::run_add(&context()?, &title, &writer, &isbn, &year)
        }
        Some(Commands::Remove { isbn }) => commands::run_remove(&context()?, &isbn),
        Some(Commands::Find { isbn }) => commands::run_find(&context()?, &isbn),
        Some(Commands::List { sort }) => {
            commands::run_list(&context()?, sort.or(settings.sort).unwrap_or_default())
        }
        Some(Commands::InitConfig { force }) => {
            let path = cli.config.clone().unwrap_or_else(config::default_config_path);
            let effective = BookdbConfig {
                database: database.as_ref().map(|p| p.display().to_string()),
                log_file: settings.log_file.clone(),
                lenient: Some(lenient),
                sort: Some(settings.sort.unwrap_or_default()),
            };
            commands::run_init_config(output_mode, &path, &effective, force)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };

    match run(cli, output_mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("Command failed: {:#}", err);
            emit_error(output_mode, &err);
            ExitCode::FAILURE
        }
    }
}
