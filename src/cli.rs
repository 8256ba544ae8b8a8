//! Command-line interface definitions for dupesweep.
//!
//! Global options (verbosity, color, config file) apply to every subcommand.
//! Scan options are shared between `find` and `clean`; any option left unset
//! falls back to the configuration file and `DUPESWEEP_*` environment.
//!
//! # Example
//!
//! ```bash
//! # List duplicate groups
//! dupesweep find ~/Downloads
//!
//! # Machine-readable output
//! dupesweep find ~/Downloads --output json
//!
//! # Preview cleanup, then move duplicates to the trash
//! dupesweep clean ~/Downloads --dry-run
//! dupesweep clean ~/Downloads --yes
//! ```

use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::scanner::HashAlgorithm;

/// Find duplicate files by content and sweep away the extra copies.
///
/// Files are compared by a cryptographic digest of their full contents.
/// Cleanup keeps the first copy of each group and moves the rest to the
/// system trash unless `--permanent` is given.
#[derive(Debug, Parser)]
#[command(name = "dupesweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Read settings from this TOML file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory and report groups of identical files
    Find(FindArgs),
    /// Scan a directory and delete all but one copy of each duplicate
    Clean(CleanArgs),
}

impl Commands {
    /// Scan options shared by every subcommand.
    #[must_use]
    pub fn scan_options(&self) -> &ScanOptions {
        match self {
            Self::Find(args) => &args.scan,
            Self::Clean(args) => &args.scan,
        }
    }
}

/// Options that control how a directory is scanned.
#[derive(Debug, Clone, Args)]
pub struct ScanOptions {
    /// Directory to scan (recursively)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Number of threads used for hashing (1 hashes sequentially)
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Digest algorithm used to compare contents
    #[arg(long, value_enum)]
    pub algorithm: Option<HashAlgorithm>,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Gitignore-style patterns to exclude (can be specified multiple times)
    ///
    /// These are added to any patterns from the configuration file and to
    /// the scanned directory's own .gitignore.
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Skip files that cannot be read instead of aborting the scan
    #[arg(short = 'k', long)]
    pub keep_going: bool,
}

/// Arguments for the find subcommand.
#[derive(Debug, Args)]
pub struct FindArgs {
    #[command(flatten)]
    pub scan: ScanOptions,
}

/// Arguments for the clean subcommand.
#[derive(Debug, Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub scan: ScanOptions,

    /// Delete permanently instead of moving to the trash
    ///
    /// Warning: files cannot be recovered after permanent deletion.
    #[arg(long)]
    pub permanent: bool,

    /// Show what would be deleted without deleting anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON document for scripting
    Json,
    /// CSV rows for spreadsheets
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}
