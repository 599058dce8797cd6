//! CLI configuration file (`leadflow.toml`).
//!
//! Everything here has a sensible default; the file is optional and flags
//! override it.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Default config filename looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "leadflow.toml";
/// Database path used when neither flag nor config file names one.
pub const DEFAULT_DATABASE: &str = "leadflow.db";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Path to the SQLite lead database.
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE)
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

impl CliConfig {
    /// Load configuration.
    ///
    /// An explicitly passed path must exist; the default `leadflow.toml` is
    /// optional and silently falls back to defaults when absent.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !path.exists() {
            if required {
                anyhow::bail!("config file not found: {}", path.display());
            }
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parse config {}", path.display()))
    }
}
