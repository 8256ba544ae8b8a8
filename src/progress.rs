//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`ProgressCallback`] trait consumed by the
//! duplicate finder and [`Progress`], which renders terminal progress bars
//! for both the hashing phase and the deletion batch.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::actions::{DeleteProgressCallback, DeletionSummary};

/// Progress callback for duplicate finding phases.
///
/// Implement this trait to receive progress updates during a scan.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ("walk" or "hash")
    /// * `total` - Total number of items to process (0 when unknown)
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Number of items processed so far (1-based)
    /// * `path` - Path just processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when an item has been hashed, providing its size.
    fn on_item_completed(&self, _bytes: u64) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Progress reporter using indicatif.
///
/// Bars are drawn to stderr so stdout stays clean for JSON and CSV output.
pub struct Progress {
    hashing: Mutex<Option<ProgressBar>>,
    deleting: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupesweep::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// assert!(!progress.is_quiet());
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            hashing: Mutex::new(None),
            deleting: Mutex::new(None),
            quiet,
        }
    }

    /// Whether bars are suppressed.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn bar(&self, total: usize, template: &str, message: &str) -> ProgressBar {
        let pb = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::with_template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█>-"),
        );
        pb.set_message(message.to_string());
        pb
    }
}

fn slot(mutex: &Mutex<Option<ProgressBar>>) -> MutexGuard<'_, Option<ProgressBar>> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        if phase == "walk" {
            let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
            pb.set_style(
                ProgressStyle::with_template("{spinner} {msg} [{elapsed_precise}]")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Walking directory tree");
            pb.enable_steady_tick(Duration::from_millis(100));
            *slot(&self.hashing) = Some(pb);
            return;
        }

        let pb = self.bar(
            total,
            "[{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
            phase,
        );
        *slot(&self.hashing) = Some(pb);
    }

    fn on_progress(&self, current: usize, path: &str) {
        if let Some(pb) = slot(&self.hashing).as_ref() {
            pb.set_position(current as u64);
            pb.set_message(truncate_path(path, 30));
        }
    }

    fn on_phase_end(&self, _phase: &str) {
        if let Some(pb) = slot(&self.hashing).take() {
            pb.finish_and_clear();
        }
    }
}

impl DeleteProgressCallback for Progress {
    fn on_before_delete(&self, path: &Path, index: usize, total: usize) {
        if self.quiet {
            return;
        }

        let mut deleting = slot(&self.deleting);
        let pb = deleting.get_or_insert_with(|| {
            self.bar(
                total,
                "[{elapsed_precise}] [{bar:40.red/blue}] {pos}/{len} {msg}",
                "Deleting",
            )
        });
        pb.set_position(index as u64);
        pb.set_message(truncate_path(&path.to_string_lossy(), 30));
    }

    fn on_delete_success(&self, _path: &Path, _size: u64) {
        if let Some(pb) = slot(&self.deleting).as_ref() {
            pb.inc(1);
        }
    }

    fn on_delete_failure(&self, _path: &Path, _error: &str) {
        if let Some(pb) = slot(&self.deleting).as_ref() {
            pb.inc(1);
        }
    }

    fn on_complete(&self, _summary: &DeletionSummary) {
        if let Some(pb) = slot(&self.deleting).take() {
            pb.finish_and_clear();
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
