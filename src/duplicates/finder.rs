//! Duplicate finder: enumerate, hash, group.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives one scan of a directory tree:
//! 1. **Enumerate** - ask the [`FileEnumerator`] for candidate paths
//! 2. **Hash** - resolve each file's size, skip empty files, digest the rest
//!    through the [`FileHasher`]
//! 3. **Group** - partition by digest and keep groups of 2+ files
//!    (see [`crate::duplicates::groups`])
//!
//! The first file that cannot be inspected or hashed aborts the scan unless
//! [`FinderConfig::with_continue_on_error`] is enabled, in which case the
//! failure is recorded in [`ScanSummary::errors`] and the file is left out.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let duplicates = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! for (digest, group) in &duplicates {
//!     println!("{digest}: {} copies", group.len());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use rayon::prelude::*;

use super::groups::{group_by_digest, DuplicateMap};
use crate::progress::ProgressCallback;
use crate::scanner::{
    ContentDigest, FileEnumerator, FileHasher, FileRecord, HashError, Hasher, ScanError, Walker,
};

/// Configuration for a duplicate scan.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of threads used for hashing. `1` hashes sequentially.
    pub io_threads: usize,
    /// Record unreadable files and keep scanning instead of aborting.
    pub continue_on_error: bool,
    /// Optional progress callback
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("continue_on_error", &self.continue_on_error)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: 1,
            continue_on_error: false,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the number of hashing threads (clamped to at least 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Skip and record unreadable files instead of aborting.
    #[must_use]
    pub fn with_continue_on_error(mut self, enabled: bool) -> Self {
        self.continue_on_error = enabled;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Statistics from a duplicate scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Files returned by the enumerator
    pub total_files: usize,
    /// Zero-length files that were skipped
    pub empty_files: usize,
    /// Files whose digest was computed
    pub hashed_files: usize,
    /// Bytes read while hashing
    pub bytes_hashed: u64,
    /// Groups of 2+ identical files
    pub duplicate_groups: usize,
    /// Files that would be removed by cleanup (keepers excluded)
    pub duplicate_files: usize,
    /// Bytes freed by removing every duplicate but the keeper
    pub reclaimable_space: u64,
    /// Files skipped because they could not be read
    pub errors: Vec<(PathBuf, String)>,
    /// Wall-clock duration of the scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Whether any file was skipped because of an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Reclaimable space as a human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Hashed bytes as a human-readable string.
    #[must_use]
    pub fn bytes_hashed_display(&self) -> String {
        ByteSize::b(self.bytes_hashed).to_string()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// A required argument was empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Enumeration or metadata lookup failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl FinderError {
    fn from_enumeration(err: ScanError) -> Self {
        match err {
            ScanError::InvalidArgument(what) => Self::InvalidArgument(what),
            ScanError::NotFound(path) => Self::PathNotFound(path),
            ScanError::NotADirectory(path) => Self::NotADirectory(path),
            other => Self::Scan(other),
        }
    }
}

/// What happened to one enumerated path.
enum FileOutcome {
    Empty,
    Hashed(FileRecord, ContentDigest),
}

/// Finds groups of identical files under a directory.
///
/// Enumeration and hashing are pluggable so the finder can be exercised
/// against in-memory tables.
///
/// # Example
///
/// ```no_run
/// use dupesweep::duplicates::{DuplicateFinder, FinderConfig};
/// use dupesweep::scanner::{Hasher, Walker};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let finder = DuplicateFinder::new(
///     Arc::new(Walker::default()),
///     Arc::new(Hasher::new()),
///     FinderConfig::default().with_io_threads(4),
/// );
///
/// let (groups, summary) = finder.scan(Path::new("/some/path")).unwrap();
/// println!("Found {} duplicate groups", groups.len());
/// println!("Reclaimable space: {}", summary.reclaimable_display());
/// ```
pub struct DuplicateFinder {
    enumerator: Arc<dyn FileEnumerator>,
    hasher: Arc<dyn FileHasher>,
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a finder from its collaborators.
    #[must_use]
    pub fn new(
        enumerator: Arc<dyn FileEnumerator>,
        hasher: Arc<dyn FileHasher>,
        config: FinderConfig,
    ) -> Self {
        Self {
            enumerator,
            hasher,
            config,
        }
    }

    /// Filesystem walker, BLAKE3 hasher, sequential, abort on first error.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(Walker::default()),
            Arc::new(Hasher::new()),
            FinderConfig::default(),
        )
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find the duplicate groups under `directory`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `directory` is empty
    /// - `PathNotFound` / `NotADirectory` for a bad root
    /// - `Scan` / `Hash` for the first unreadable file, unless
    ///   `continue_on_error` is set
    pub fn find_duplicates(&self, directory: &Path) -> Result<DuplicateMap, FinderError> {
        self.scan(directory).map(|(groups, _)| groups)
    }

    /// Like [`find_duplicates`](Self::find_duplicates), also returning scan statistics.
    ///
    /// # Errors
    ///
    /// Same as [`find_duplicates`](Self::find_duplicates).
    pub fn scan(&self, directory: &Path) -> Result<(DuplicateMap, ScanSummary), FinderError> {
        let start = Instant::now();
        if directory.as_os_str().is_empty() {
            return Err(FinderError::InvalidArgument("directory path is empty"));
        }

        log::info!("Scanning {}", directory.display());
        if let Some(cb) = &self.config.progress_callback {
            cb.on_phase_start("walk", 0);
        }
        let paths = self
            .enumerator
            .enumerate_files(directory)
            .map_err(FinderError::from_enumeration);
        if let Some(cb) = &self.config.progress_callback {
            cb.on_phase_end("walk");
        }
        let paths = paths?;

        let mut summary = ScanSummary {
            total_files: paths.len(),
            ..ScanSummary::default()
        };

        if let Some(cb) = &self.config.progress_callback {
            cb.on_phase_start("hash", paths.len());
        }

        let mut entries = Vec::with_capacity(paths.len());
        let processed = AtomicUsize::new(0);

        match self.thread_pool() {
            Some(pool) => {
                // Lowest index that has failed so far; later files are not read.
                let first_failure = AtomicUsize::new(usize::MAX);
                let outcomes: Vec<Option<_>> = pool.install(|| {
                    paths
                        .par_iter()
                        .enumerate()
                        .map(|(index, path)| {
                            if !self.config.continue_on_error
                                && index > first_failure.load(Ordering::Acquire)
                            {
                                return None;
                            }
                            let outcome = self.process(path, &processed);
                            if outcome.is_err() && !self.config.continue_on_error {
                                first_failure.fetch_min(index, Ordering::AcqRel);
                            }
                            Some(outcome)
                        })
                        .collect()
                });
                // Every index before the first failure was processed, so the
                // ordered fold returns that failure before reaching a skip.
                for (path, outcome) in paths.iter().zip(outcomes) {
                    if let Some(outcome) = outcome {
                        self.fold(path, outcome, &mut entries, &mut summary)?;
                    }
                }
            }
            None => {
                for path in &paths {
                    let outcome = self.process(path, &processed);
                    self.fold(path, outcome, &mut entries, &mut summary)?;
                }
            }
        }

        if let Some(cb) = &self.config.progress_callback {
            cb.on_phase_end("hash");
        }

        let (groups, stats) = group_by_digest(entries);
        summary.duplicate_groups = stats.duplicate_groups;
        summary.duplicate_files = groups.values().map(|g| g.candidates().len()).sum();
        summary.reclaimable_space = groups.values().map(|g| g.reclaimable_bytes()).sum();
        summary.scan_duration = start.elapsed();

        log::info!(
            "Scanned {} files ({} empty, {} hashed, {}): {} duplicate groups, {} reclaimable",
            summary.total_files,
            summary.empty_files,
            summary.hashed_files,
            summary.bytes_hashed_display(),
            summary.duplicate_groups,
            summary.reclaimable_display()
        );

        Ok((groups, summary))
    }

    /// A dedicated pool when more than one hashing thread is configured.
    fn thread_pool(&self) -> Option<rayon::ThreadPool> {
        if self.config.io_threads <= 1 {
            return None;
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                log::warn!("Failed to build hashing pool, hashing sequentially: {}", e);
                None
            }
        }
    }

    /// Resolve metadata and hash one path. Empty files are never hashed.
    fn process(&self, path: &Path, processed: &AtomicUsize) -> Result<FileOutcome, FinderError> {
        let record = self.enumerator.file_record(path)?;
        let outcome = if record.is_empty() {
            FileOutcome::Empty
        } else {
            let digest = self.hasher.compute_hash(&record)?;
            FileOutcome::Hashed(record, digest)
        };

        if let Some(cb) = &self.config.progress_callback {
            let current = processed.fetch_add(1, Ordering::Relaxed) + 1;
            cb.on_progress(current, &path.to_string_lossy());
            if let FileOutcome::Hashed(record, _) = &outcome {
                cb.on_item_completed(record.size);
            }
        }

        Ok(outcome)
    }

    /// Fold one outcome into the scan state, in enumeration order.
    fn fold(
        &self,
        path: &Path,
        outcome: Result<FileOutcome, FinderError>,
        entries: &mut Vec<(FileRecord, ContentDigest)>,
        summary: &mut ScanSummary,
    ) -> Result<(), FinderError> {
        match outcome {
            Ok(FileOutcome::Empty) => {
                log::debug!("Skipping empty file: {}", path.display());
                summary.empty_files += 1;
            }
            Ok(FileOutcome::Hashed(record, digest)) => {
                summary.hashed_files += 1;
                summary.bytes_hashed += record.size;
                entries.push((record, digest));
            }
            Err(err) if self.config.continue_on_error => {
                log::warn!("Skipping unreadable file {}: {}", path.display(), err);
                summary.errors.push((path.to_path_buf(), err.to_string()));
            }
            Err(err) => {
                log::error!("Scan aborted at {}: {}", path.display(), err);
                return Err(err);
            }
        }
        Ok(())
    }
}
