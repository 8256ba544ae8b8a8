//! dupesweep - content-based duplicate file finder
//!
//! Scans a directory tree, groups regular files whose contents hash to the
//! same digest, and optionally deletes every copy but the first of each
//! group, reporting the outcome of each deletion individually.
//!
//! The library is usable on its own:
//!
//! ```no_run
//! use dupesweep::actions::DuplicateCleaner;
//! use dupesweep::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let groups = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("/data"))
//!     .unwrap();
//! println!("{} duplicate groups", groups.len());
//!
//! let outcomes = DuplicateCleaner::with_defaults().clear_groups(&groups);
//! println!("{} files sent to the trash", outcomes.iter().filter(|o| o.success).count());
//! ```
//!
//! The `dupesweep` binary wraps it through [`run_app`].

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::actions::{
    plan_deletions, DeleteConfig, DeleteProgressCallback, Deleter, DeletionOutcome,
    DeletionSummary, DuplicateCleaner,
};
use crate::cli::{CleanArgs, Cli, Commands, OutputFormat, ScanOptions};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, DuplicateMap, FinderConfig, ScanSummary};
use crate::error::ExitCode;
use crate::output::{text, CsvOutput, JsonOutput, TextOutput};
use crate::progress::{Progress, ProgressCallback};
use crate::scanner::{HashAlgorithm, Hasher, Walker, WalkerConfig};

/// Effective settings for one run: configuration overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub io_threads: usize,
    pub algorithm: HashAlgorithm,
    pub skip_hidden: bool,
    /// Configured patterns followed by the ones given on the command line
    pub ignore_patterns: Vec<String>,
    pub continue_on_error: bool,
    pub permanent: bool,
}

impl Settings {
    /// Merge flags over configuration. Boolean flags can only switch a
    /// setting on; a flag that was not given leaves the configured value.
    #[must_use]
    pub fn resolve(config: &Config, scan: &ScanOptions, permanent: bool) -> Self {
        let mut ignore_patterns = config.ignore_patterns.clone();
        ignore_patterns.extend(scan.ignore_patterns.iter().cloned());

        Self {
            io_threads: scan.io_threads.unwrap_or(config.io_threads).max(1),
            algorithm: scan.algorithm.unwrap_or(config.algorithm),
            skip_hidden: scan.skip_hidden || config.skip_hidden,
            ignore_patterns,
            continue_on_error: scan.keep_going || config.continue_on_error,
            permanent: permanent || config.permanent,
        }
    }

    /// Build a filesystem-backed finder for these settings.
    #[must_use]
    pub fn finder(&self, progress: Option<Arc<dyn ProgressCallback>>) -> DuplicateFinder {
        let mut config = FinderConfig::default()
            .with_io_threads(self.io_threads)
            .with_continue_on_error(self.continue_on_error);
        if let Some(progress) = progress {
            config = config.with_progress_callback(progress);
        }

        let walker = Walker::new(WalkerConfig::new(
            self.skip_hidden,
            self.ignore_patterns.clone(),
        ));
        DuplicateFinder::new(
            Arc::new(walker),
            Arc::new(Hasher::with_algorithm(self.algorithm)),
            config,
        )
    }

    #[must_use]
    pub fn delete_config(&self) -> DeleteConfig {
        if self.permanent {
            DeleteConfig::permanent()
        } else {
            DeleteConfig::trash()
        }
    }
}

/// Run the command described by `cli` and return the process exit code.
///
/// # Errors
///
/// Returns an error when configuration cannot be loaded, the scan aborts,
/// output cannot be written, or a cleanup needs confirmation that cannot
/// be asked for.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color || !io::stdout().is_terminal() {
        yansi::disable();
    }

    let config = match &cli.config {
        Some(path) => {
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            Config::try_load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => Config::load(),
    };
    let hide_progress = cli.quiet || cli.command.scan_options().output != OutputFormat::Text;
    let progress = Arc::new(Progress::new(hide_progress));

    match cli.command {
        Commands::Find(args) => run_find(&args.scan, &config, progress),
        Commands::Clean(args) => run_clean(&args, &config, progress),
    }
}

fn run_find(scan: &ScanOptions, config: &Config, progress: Arc<Progress>) -> Result<ExitCode> {
    let settings = Settings::resolve(config, scan, false);
    log::debug!("Effective settings: {:?}", settings);

    let callback: Arc<dyn ProgressCallback> = progress;
    let (groups, summary) = settings
        .finder(Some(callback))
        .scan(&scan.path)
        .with_context(|| format!("Failed to scan {}", scan.path.display()))?;
    let exit_code = scan_exit_code(&groups, &summary);

    let stdout = io::stdout().lock();
    match scan.output {
        OutputFormat::Text => TextOutput::new(&groups, &summary).write_to(stdout)?,
        OutputFormat::Json => {
            JsonOutput::new(settings.algorithm, &groups, &summary, exit_code).write_to(stdout)?;
        }
        OutputFormat::Csv => CsvOutput::new(&groups).write_to(stdout)?,
    }

    Ok(exit_code)
}

fn run_clean(args: &CleanArgs, config: &Config, progress: Arc<Progress>) -> Result<ExitCode> {
    let scan = &args.scan;
    let settings = Settings::resolve(config, scan, args.permanent);
    log::debug!("Effective settings: {:?}", settings);

    let scan_callback: Arc<dyn ProgressCallback> = progress.clone();
    let delete_callback: Arc<dyn DeleteProgressCallback> = progress;
    let deleter = Deleter::new(settings.delete_config()).with_callback(delete_callback);
    let cleaner = DuplicateCleaner::new(settings.finder(Some(scan_callback)), Arc::new(deleter));

    let (groups, summary) = cleaner
        .finder()
        .scan(&scan.path)
        .with_context(|| format!("Failed to scan {}", scan.path.display()))?;
    let planned = plan_deletions(&groups);
    let deletable = planned.iter().filter(|o| o.error.is_none()).count();

    let mut report = CleanReport {
        output: scan.output,
        settings: &settings,
        groups: &groups,
        summary: &summary,
        dry_run: true,
    };
    let mut stdout = io::stdout().lock();

    if deletable == 0 || args.dry_run {
        if args.dry_run {
            log::info!("Dry run: nothing will be deleted");
        }
        let exit_code = scan_exit_code(&groups, &summary);
        report.write(&planned, exit_code, &mut stdout)?;
        return Ok(exit_code);
    }

    if scan.output == OutputFormat::Text {
        text::write_plan(&planned, settings.permanent, &mut stdout)?;
        stdout.flush()?;
    }
    if !args.yes && !confirm(deletable, settings.permanent)? {
        log::warn!("Cleanup cancelled; nothing was deleted");
        return Ok(ExitCode::Success);
    }

    let outcomes = cleaner.clear_groups(&groups);
    let deletion = DeletionSummary::from_outcomes(&outcomes);
    let exit_code = if deletion.all_succeeded() && !summary.has_errors() {
        ExitCode::Success
    } else {
        ExitCode::PartialSuccess
    };

    report.dry_run = false;
    report.write(&outcomes, exit_code, &mut stdout)?;
    Ok(exit_code)
}

/// Exit code for a finished scan: skipped files win over "nothing found".
fn scan_exit_code(groups: &DuplicateMap, summary: &ScanSummary) -> ExitCode {
    if summary.has_errors() {
        ExitCode::PartialSuccess
    } else if groups.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    }
}

struct CleanReport<'a> {
    output: OutputFormat,
    settings: &'a Settings,
    groups: &'a DuplicateMap,
    summary: &'a ScanSummary,
    dry_run: bool,
}

impl CleanReport<'_> {
    fn write<W: Write>(
        &self,
        outcomes: &[DeletionOutcome],
        exit_code: ExitCode,
        mut writer: W,
    ) -> Result<()> {
        match self.output {
            OutputFormat::Text if outcomes.is_empty() => {
                TextOutput::new(self.groups, self.summary).write_summary(&mut writer)?;
            }
            OutputFormat::Text if self.dry_run => {
                text::write_plan(outcomes, self.settings.permanent, &mut writer)?;
            }
            OutputFormat::Text => text::write_outcomes(outcomes, &mut writer)?,
            OutputFormat::Json => {
                JsonOutput::new(self.settings.algorithm, self.groups, self.summary, exit_code)
                    .with_deletions(outcomes, self.dry_run)
                    .write_to(&mut writer)?;
            }
            OutputFormat::Csv => output::csv::write_outcomes(outcomes, &mut writer)?,
        }
        Ok(())
    }
}

/// Ask on the terminal before deleting. Non-interactive runs need `--yes`.
fn confirm(count: usize, permanent: bool) -> Result<bool> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        bail!("Refusing to delete {count} file(s) without confirmation; re-run with --yes");
    }

    let how = if permanent { "Permanently delete" } else { "Move to trash" };
    eprint!("{how} {count} file(s)? [y/N] ");
    io::stderr().flush()?;

    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
