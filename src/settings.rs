use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;
use tracing::{debug, info};

use crate::owners::{OwnerDirectory, OwnerTables};

/// Runtime settings: built-in defaults, then `rankings.{toml,json}` in the
/// working directory, then `RANKINGS_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Season for files whose name carries no year.
    pub default_season: String,
    pub expected_teams: usize,
    /// Exact filenames to ignore (known duplicates).
    pub skip_files: Vec<String>,
    /// JSON file with `owners`, `aliases` and `teams` tables.
    pub owners_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            input_dir: PathBuf::from("power_rankings"),
            output_dir: PathBuf::from("site/data"),
            default_season: "2024".into(),
            expected_teams: 16,
            skip_files: vec!["Free Chee Week 12 Power Rankings.txt".into()],
            owners_file: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(config::File::with_name("rankings").required(false))
            .add_source(
                config::Environment::with_prefix("RANKINGS")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("skip_files"),
            )
            .build()
            .context("reading settings")?
            .try_deserialize()
            .context("invalid settings")?;
        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    /// The owner directory: the configured tables, or the built-in league.
    pub fn owner_directory(&self) -> Result<OwnerDirectory> {
        let tables = match &self.owners_file {
            Some(path) => load_owner_tables(path)?,
            None => OwnerTables::league(),
        };
        Ok(OwnerDirectory::new(tables)?)
    }
}

fn load_owner_tables(path: &Path) -> Result<OwnerTables> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading owner tables {}", path.display()))?;
    let tables: OwnerTables = serde_json::from_str(&raw)
        .with_context(|| format!("parsing owner tables {}", path.display()))?;
    info!(
        path = %path.display(),
        owners = tables.owners.len(),
        teams = tables.teams.len(),
        "loaded owner tables"
    );
    Ok(tables)
}
