//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Recursive, sorted directory walking using walkdir
//! - Streaming content hashing (BLAKE3 or SHA-256)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal behind the [`FileEnumerator`] trait
//! - [`hasher`]: Streaming file hashing behind the [`FileHasher`] trait
//!
//! Both traits exist so the duplicate finder can run against in-memory
//! tables in tests instead of a real disk.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::scanner::{FileEnumerator, FileHasher, Hasher, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(WalkerConfig::default());
//! let hasher = Hasher::new();
//!
//! for path in walker.enumerate_files(Path::new(".")).unwrap() {
//!     let record = walker.file_record(&path).unwrap();
//!     let digest = hasher.compute_hash(&record).unwrap();
//!     println!("{} {}", digest, record.path.display());
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Re-export main types
pub use hasher::{FileHasher, HashAlgorithm, Hasher, BUFFER_SIZE};
pub use walker::{FileEnumerator, Walker};

/// A file's identity for one scan: where it lives and how big it is.
///
/// Captured from filesystem metadata at enumeration time and never
/// refreshed during the same pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileRecord {
    /// Create a new FileRecord.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Whether the file has no content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Fixed-length digest of a file's full content.
///
/// Only ever used as a grouping key. Two files are treated as duplicates
/// exactly when their digests are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest(Vec<u8>);

impl ContentDigest {
    /// Wrap raw digest bytes.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Digest length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the digest has no bytes (never produced by a real hasher).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the grouping key: uppercase hexadecimal, two digits per byte.
    #[must_use]
    pub fn to_key(&self) -> String {
        let mut key = String::with_capacity(self.0.len() * 2);
        for byte in &self.0 {
            key.push_str(&format!("{byte:02X}"));
        }
        key
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key())
    }
}

/// Parses a hex key in either case.
impl FromStr for ContentDigest {
    type Err = DigestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() % 2 != 0 {
            return Err(DigestParseError::OddLength(s.len()));
        }
        let bytes = (0..s.len())
            .step_by(2)
            .map(|i| {
                s.get(i..i + 2)
                    .filter(|pair| pair.bytes().all(|b| b.is_ascii_hexdigit()))
                    .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                    .ok_or_else(|| DigestParseError::InvalidHex(s.to_string()))
            })
            .collect::<Result<Vec<u8>, _>>()?;
        Ok(Self(bytes))
    }
}

/// Errors from parsing a digest key.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DigestParseError {
    /// A hex key must have an even number of digits.
    #[error("digest key has odd length {0}")]
    OddLength(usize),

    /// The key contains characters outside `[0-9a-fA-F]`.
    #[error("invalid hex digest: {0}")]
    InvalidHex(String),
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Glob patterns to ignore (gitignore-style).
    /// These are applied in addition to any .gitignore file at the root.
    pub ignore_patterns: Vec<String>,
}

impl WalkerConfig {
    /// Create a new configuration from CLI arguments.
    #[must_use]
    pub fn new(skip_hidden: bool, ignore_patterns: Vec<String>) -> Self {
        Self {
            skip_hidden,
            ignore_patterns,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// A required argument was empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The directory walk itself failed.
    #[error("walk failed under {path}: {message}")]
    Walk {
        /// Path where the walk failed
        path: PathBuf,
        /// Description from the walker
        message: String,
    },

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error raised for `path`.
    #[must_use]
    pub fn from_io(path: &Path, err: io::Error) -> Self {
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

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// No file was given.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// Path the error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::InvalidArgument(_) => None,
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => Some(p),
        }
    }
}
