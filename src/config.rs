// src/config.rs
// =============================================================================
// Settings, read from an optional TOML file.
//
// Lookup order:
// 1. --config <path> (must exist)
// 2. mirror-scout.toml in the working directory (if present)
// 3. built-in defaults
//
// Command-line flags are applied on top in main.rs.
//
// Example file:
//
//   database_path = "media_sources.db"
//   export_path = "my_sites_report.csv"
//   log_level = "info"
//
//   [probe]
//   timeout_ms = 3000
//   concurrency = 50
//   top_n = 3
// =============================================================================

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::prober::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_MS};
use crate::ranker::DEFAULT_TOP_N;

pub const DEFAULT_CONFIG_FILE: &str = "mirror-scout.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file holding the site list and the credential
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Where `export` writes the CSV report
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,

    /// trace, debug, info, warn or error (RUST_LOG wins if set)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// How many probes may be in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// How many sites a recommendation lists
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("media_sources.db")
}

fn default_export_path() -> PathBuf {
    PathBuf::from("my_sites_report.csv")
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            concurrency: default_concurrency(),
            top_n: default_top_n(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            export_path: default_export_path(),
            log_level: default_log_level(),
            probe: ProbeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Rejects values that would make a recommendation cycle meaningless.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.probe.top_n >= 1, "probe.top_n must be at least 1");
        // buffered(0) would never poll a single request
        ensure!(
            self.probe.concurrency >= 1,
            "probe.concurrency must be at least 1"
        );
        Ok(())
    }

    /// Explicit path if given, else the default file if it exists, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe.timeout_ms)
    }
}
