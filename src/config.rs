//! Runtime configuration resolved from command-line flags and the environment.
//!
//! Flags win over `STUDYPLAN_*` environment variables (clap reads both),
//! which win over the defaults below.

use std::path::{Path, PathBuf};

use planner_core::derivation::{Limits, WeekStart};
use planner_core::Database;

use crate::cli::Cli;

/// Where the study data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Sqlite(PathBuf),
    /// A plain JSON document, the same shape as `export` writes.
    Json(PathBuf),
}

impl Storage {
    /// Pick the backend from the file extension: `.json` is a JSON file,
    /// anything else is a SQLite database.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::Json(path)
        } else {
            Self::Sqlite(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Sqlite(path) | Self::Json(path) => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub storage: Storage,
    pub week_start: WeekStart,
    pub limits: Limits,
    pub json: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> planner_core::Result<Self> {
        let path = match &cli.db {
            Some(path) => path.clone(),
            None => Database::default_path()?,
        };
        let config = Self {
            storage: Storage::from_path(path),
            week_start: cli.week_start.unwrap_or_default(),
            limits: Limits::default(),
            json: cli.json,
        };
        tracing::debug!(
            storage = %config.storage.path().display(),
            week_start = %config.week_start,
            "Resolved configuration"
        );
        Ok(config)
    }
}
