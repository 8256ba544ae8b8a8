//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`FileEnumerator`] trait, the seam through which
//! the duplicate finder discovers candidate files, and [`Walker`], its
//! filesystem implementation.
//!
//! # Features
//!
//! - Recursive traversal, entries sorted by file name within each directory
//!   so that the same tree always yields the same order
//! - Symbolic links are never followed
//! - Gitignore-style pattern matching via the `ignore` crate
//! - Hidden file filtering
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::scanner::{FileEnumerator, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(config);
//! for path in walker.enumerate_files(Path::new("/home/user/Downloads")).unwrap() {
//!     println!("{}", path.display());
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use walkdir::{DirEntry, WalkDir};

use super::{FileRecord, ScanError, WalkerConfig};

/// Discovers candidate files under a directory.
///
/// The returned order must be stable for an unchanged tree: the first file
/// of every duplicate group is the one that survives cleanup.
pub trait FileEnumerator: Send + Sync {
    /// Recursively list regular files under `directory`.
    ///
    /// # Errors
    ///
    /// Returns `ScanError` if the root is invalid or the walk fails.
    fn enumerate_files(&self, directory: &Path) -> Result<Vec<PathBuf>, ScanError>;

    /// Resolve the metadata of one enumerated path.
    ///
    /// # Errors
    ///
    /// Returns `ScanError` if the file can no longer be inspected.
    fn file_record(&self, path: &Path) -> Result<FileRecord, ScanError> {
        let metadata = fs::metadata(path).map_err(|e| ScanError::from_io(path, e))?;
        Ok(FileRecord::new(path, metadata.len()))
    }
}

/// Directory walker for file discovery.
#[derive(Debug, Clone, Default)]
pub struct Walker {
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker.
    #[must_use]
    pub fn new(config: WalkerConfig) -> Self {
        Self { config }
    }

    /// Build gitignore matcher from config patterns and the root .gitignore file.
    fn build_gitignore(&self, root: &Path) -> Option<Gitignore> {
        let mut builder = GitignoreBuilder::new(root);

        let gitignore_path = root.join(".gitignore");
        if gitignore_path.is_file() {
            if let Some(e) = builder.add(&gitignore_path) {
                log::warn!(
                    "Failed to load .gitignore from {}: {}",
                    gitignore_path.display(),
                    e
                );
            } else {
                log::debug!("Loaded .gitignore from {}", gitignore_path.display());
            }
        }

        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if gitignore.is_empty() => None,
            Ok(gitignore) => Some(gitignore),
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Whether an entry (and, for directories, its subtree) is excluded.
    fn is_excluded(&self, entry: &DirEntry, root: &Path, gitignore: Option<&Gitignore>) -> bool {
        if entry.depth() == 0 {
            return false;
        }

        if self.config.skip_hidden && is_hidden(entry) {
            log::trace!("Skipping hidden entry: {}", entry.path().display());
            return true;
        }

        let Some(gi) = gitignore else {
            return false;
        };

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let normalized = if cfg!(windows) {
            relative.to_string_lossy().replace('\\', "/")
        } else {
            relative.to_string_lossy().into_owned()
        };

        let ignored = gi
            .matched(normalized, entry.file_type().is_dir())
            .is_ignore();
        if ignored {
            log::trace!("Ignored by pattern: {}", entry.path().display());
        }
        ignored
    }
}

impl FileEnumerator for Walker {
    fn enumerate_files(&self, directory: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if directory.as_os_str().is_empty() {
            return Err(ScanError::InvalidArgument("directory path is empty"));
        }

        let root = std::path::absolute(directory).map_err(|e| ScanError::from_io(directory, e))?;
        let metadata = fs::metadata(&root).map_err(|e| ScanError::from_io(&root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(root));
        }

        let gitignore = self.build_gitignore(&root);
        let walk = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry, &root, gitignore.as_ref()));

        let mut files = Vec::new();
        for entry in walk {
            let entry = entry.map_err(|e| walk_error(&root, e))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        log::debug!("Enumerated {} files under {}", files.len(), root.display());
        Ok(files)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn walk_error(root: &Path, err: walkdir::Error) -> ScanError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let message = err.to_string();
    match err.into_io_error() {
        Some(io) => ScanError::from_io(&path, io),
        None => ScanError::Walk { path, message },
    }
}
