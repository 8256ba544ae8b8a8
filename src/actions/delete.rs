//! Safe file deletion using the trash crate.
//!
//! # Overview
//!
//! This module provides the [`FileDeleter`] trait and [`Deleter`], its
//! filesystem implementation:
//! - Move to system trash (default, recoverable)
//! - Permanent deletion (only with an explicit [`DeleteConfig::permanent`])
//! - Per-file outcome reporting: one failure never stops the batch
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::actions::{DeleteConfig, Deleter, DeletionOutcome, FileDeleter};
//!
//! let mut batch = vec![DeletionOutcome::pending("/path/to/duplicate.txt", 1024)];
//! Deleter::new(DeleteConfig::trash()).delete_files(&mut batch);
//!
//! for outcome in &batch {
//!     match &outcome.error {
//!         None => println!("Deleted: {}", outcome.path.display()),
//!         Some(e) => eprintln!("Failed: {}: {}", outcome.path.display(), e),
//!     }
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytesize::ByteSize;
use serde::Serialize;
use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("permanent delete failed for {path}: {message}")]
    PermanentDeleteFailed { path: PathBuf, message: String },

    /// Attempted to delete all copies (at least one must be preserved).
    #[error("cannot delete all copies - at least one file must be preserved")]
    AllCopiesWouldBeDeleted,

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error (if any).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::PermanentDeleteFailed { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            Self::AllCopiesWouldBeDeleted => None,
        }
    }

    fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// Report for one file submitted for deletion.
///
/// Created as a placeholder by the cleaner and filled in exactly once by a
/// [`FileDeleter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionOutcome {
    /// File that was submitted
    pub path: PathBuf,
    /// Size recorded at scan time
    pub size: u64,
    /// Whether the file was removed
    pub success: bool,
    /// Why removal failed, when it did
    pub error: Option<String>,
}

impl DeletionOutcome {
    /// Placeholder for a file that has not been processed yet.
    #[must_use]
    pub fn pending(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            success: false,
            error: None,
        }
    }

    /// Record a successful deletion.
    pub fn mark_deleted(&mut self) {
        self.success = true;
        self.error = None;
    }

    /// Record a failed deletion.
    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.success = false;
        self.error = Some(message.into());
    }
}

/// Aggregate view over a batch of outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionSummary {
    /// Files removed
    pub success_count: usize,
    /// Files that could not be removed
    pub failure_count: usize,
    /// Bytes freed by the successful removals
    pub bytes_freed: u64,
}

impl DeletionSummary {
    /// Summarise a batch.
    #[must_use]
    pub fn from_outcomes(outcomes: &[DeletionOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut acc, outcome| {
            if outcome.success {
                acc.success_count += 1;
                acc.bytes_freed += outcome.size;
            } else {
                acc.failure_count += 1;
            }
            acc
        })
    }

    /// Total number of attempted deletions.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failure_count == 0
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let freed = ByteSize::b(self.bytes_freed);
        if self.all_succeeded() {
            format!("Deleted {} file(s), freed {}", self.success_count, freed)
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {}",
                self.success_count, self.failure_count, freed
            )
        }
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfig {
    /// Use permanent deletion instead of trash.
    pub permanent: bool,
}

impl DeleteConfig {
    /// Create config for trash deletion.
    #[must_use]
    pub fn trash() -> Self {
        Self::default()
    }

    /// Create config for permanent deletion.
    #[must_use]
    pub fn permanent() -> Self {
        Self { permanent: true }
    }
}

/// Callback trait for deletion progress reporting.
pub trait DeleteProgressCallback: Send + Sync {
    /// Called before each file deletion.
    fn on_before_delete(&self, path: &Path, index: usize, total: usize);

    /// Called after successful deletion.
    fn on_delete_success(&self, path: &Path, size: u64);

    /// Called after failed deletion.
    fn on_delete_failure(&self, path: &Path, error: &str);

    /// Called when the batch completes.
    fn on_complete(&self, summary: &DeletionSummary);
}

/// Deletes a batch of files, reporting per file.
///
/// Implementations must attempt every outcome in the slice regardless of
/// earlier failures, and fill in `success`/`error` on each.
pub trait FileDeleter: Send + Sync {
    /// Attempt to delete every file in `outcomes`, updating each in place.
    fn delete_files(&self, outcomes: &mut [DeletionOutcome]);
}

/// Filesystem deleter: trash by default, permanent on request.
#[derive(Clone, Default)]
pub struct Deleter {
    config: DeleteConfig,
    callback: Option<Arc<dyn DeleteProgressCallback>>,
}

impl std::fmt::Debug for Deleter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deleter")
            .field("config", &self.config)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl Deleter {
    /// Create a deleter.
    #[must_use]
    pub fn new(config: DeleteConfig) -> Self {
        Self {
            config,
            callback: None,
        }
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_callback(mut self, callback: Arc<dyn DeleteProgressCallback>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &DeleteConfig {
        &self.config
    }

    fn delete_one(&self, path: &Path) -> Result<(), DeleteError> {
        if self.config.permanent {
            permanent_delete(path)
        } else {
            delete_to_trash(path)
        }
    }
}

impl FileDeleter for Deleter {
    fn delete_files(&self, outcomes: &mut [DeletionOutcome]) {
        let total = outcomes.len();

        for (index, outcome) in outcomes.iter_mut().enumerate() {
            if let Some(cb) = &self.callback {
                cb.on_before_delete(&outcome.path, index, total);
            }

            match self.delete_one(&outcome.path) {
                Ok(()) => {
                    outcome.mark_deleted();
                    if let Some(cb) = &self.callback {
                        cb.on_delete_success(&outcome.path, outcome.size);
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    log::warn!("Failed to delete {}: {}", outcome.path.display(), message);
                    if let Some(cb) = &self.callback {
                        cb.on_delete_failure(&outcome.path, &message);
                    }
                    outcome.mark_failed(message);
                }
            }
        }

        let summary = DeletionSummary::from_outcomes(outcomes);
        if let Some(cb) = &self.callback {
            cb.on_complete(&summary);
        }
        if total > 0 {
            log::info!("{}", summary.summary());
        }
    }
}

/// Make sure `path` still names a file before acting on it.
fn ensure_file(path: &Path) -> Result<(), DeleteError> {
    fs::symlink_metadata(path)
        .map(|_| ())
        .map_err(|e| DeleteError::from_io(path, e))
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if the file cannot be inspected
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<(), DeleteError> {
    ensure_file(path)?;

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Moved to trash: {}", path.display());
    Ok(())
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if the file cannot be inspected
/// - `PermanentDeleteFailed` if removal fails
pub fn permanent_delete(path: &Path) -> Result<(), DeleteError> {
    ensure_file(path)?;

    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        DeleteError::PermanentDeleteFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Permanently deleted: {}", path.display());
    Ok(())
}

/// Validate that a selection doesn't delete all copies of a group.
///
/// # Errors
///
/// Returns `AllCopiesWouldBeDeleted` if no member of `group_paths` would survive.
///
/// # Example
///
/// ```
/// use dupesweep::actions::validate_preserves_copy;
/// use std::path::PathBuf;
///
/// let group = vec![
///     PathBuf::from("/original.txt"),
///     PathBuf::from("/copy1.txt"),
///     PathBuf::from("/copy2.txt"),
/// ];
///
/// let selected = vec![PathBuf::from("/copy1.txt"), PathBuf::from("/copy2.txt")];
/// assert!(validate_preserves_copy(&selected, &group).is_ok());
///
/// assert!(validate_preserves_copy(&group, &group).is_err());
/// ```
pub fn validate_preserves_copy(
    selected_paths: &[PathBuf],
    group_paths: &[PathBuf],
) -> Result<(), DeleteError> {
    let selected: HashSet<&PathBuf> = selected_paths.iter().collect();
    let preserved = group_paths.iter().filter(|p| !selected.contains(p)).count();

    if preserved == 0 {
        log::error!(
            "Refusing to delete all {} copies of a duplicate group",
            group_paths.len()
        );
        Err(DeleteError::AllCopiesWouldBeDeleted)
    } else {
        Ok(())
    }
}
