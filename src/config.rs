use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Listing order for `list` and the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest publishing year first
    #[default]
    Year,
    /// Order of the lines in the database file
    Insertion,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BookdbConfig {
    pub database: Option<String>,
    pub log_file: Option<String>,
    pub lenient: Option<bool>,
    pub sort: Option<SortOrder>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("bookdb.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<BookdbConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: BookdbConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &BookdbConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
