//! Application configuration management.
//!
//! Settings are layered with `figment`, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file (the platform config dir, or `--config FILE`)
//! 3. `DUPESWEEP_*` environment variables
//!
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::scanner::HashAlgorithm;

/// Prefix for environment variable overrides, e.g. `DUPESWEEP_IO_THREADS=4`.
pub const ENV_PREFIX: &str = "DUPESWEEP_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worker threads used for hashing. 1 hashes sequentially.
    pub io_threads: usize,
    /// Content digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// Extra gitignore-style patterns to exclude.
    pub ignore_patterns: Vec<String>,
    /// Delete permanently instead of moving to the trash.
    pub permanent: bool,
    /// Record per-file scan failures instead of aborting.
    pub continue_on_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            io_threads: 1,
            algorithm: HashAlgorithm::default(),
            skip_hidden: false,
            ignore_patterns: Vec::new(),
            permanent: false,
            continue_on_error: false,
        }
    }
}

impl Config {
    /// Load from the default platform-specific path plus the environment.
    ///
    /// Never fails: a broken config file is logged and defaults are used.
    #[must_use]
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from_path(path),
            None => {
                log::debug!("No platform config directory, using defaults and environment");
                Self::or_defaults(Self::figment(None).extract())
            }
        }
    }

    /// Load from a specific TOML file plus the environment.
    ///
    /// A missing file is not an error. An unreadable or malformed one is
    /// logged at warn level and defaults are used instead.
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        Self::or_defaults(Self::try_load_from_path(path))
    }

    /// Like [`load_from_path`](Self::load_from_path), but surfaces errors.
    ///
    /// Used for an explicit `--config FILE`, where a bad file should stop the run.
    ///
    /// # Errors
    ///
    /// Returns the figment error if the file or environment cannot be parsed.
    pub fn try_load_from_path(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());
        Self::figment(Some(path)).extract()
    }

    /// The layered figment, exposed for callers that want to add providers.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// The platform-specific config file, e.g. `~/.config/dupesweep/config.toml`.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "dupesweep", "dupesweep")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Render as TOML, suitable for writing a starter config file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    fn or_defaults(result: Result<Self, figment::Error>) -> Self {
        match result {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }
}
