//! Streaming content hasher.
//!
//! # Overview
//! This module provides the [`FileHasher`] trait and its filesystem-backed
//! implementation [`Hasher`]. Files are read through a fixed-size buffer so
//! memory use does not depend on file size. The open file handle lives only
//! for the duration of one [`Hasher::hash_path`] call and is closed when it
//! goes out of scope, whether hashing succeeded or not.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::scanner::{HashAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::with_algorithm(HashAlgorithm::Sha256);
//! let digest = hasher.hash_path(Path::new("Cargo.toml")).unwrap();
//! println!("{}", digest);
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use super::{ContentDigest, FileRecord, HashError};

/// Read buffer size for streaming hashes (64 KiB).
pub const BUFFER_SIZE: usize = 64 * 1024;

/// Digest algorithm used for content addressing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// BLAKE3, 256-bit output
    #[default]
    Blake3,
    /// SHA-256, 256-bit output
    Sha256,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    #[must_use]
    pub fn digest_len(self) -> usize {
        32
    }

    /// Lowercase display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Blake3 => "blake3",
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Computes the content digest of a single file.
///
/// Implementations must be deterministic: hashing unchanged content twice
/// yields equal digests.
pub trait FileHasher: Send + Sync {
    /// Read the full content of `file` and return its digest.
    ///
    /// # Errors
    ///
    /// Returns `HashError` if the file cannot be opened or read.
    fn compute_hash(&self, file: &FileRecord) -> Result<ContentDigest, HashError>;
}

/// Filesystem-backed streaming hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hasher {
    algorithm: HashAlgorithm,
}

impl Hasher {
    /// Create a hasher using the default algorithm (BLAKE3).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hasher using `algorithm`.
    #[must_use]
    pub fn with_algorithm(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// The algorithm this hasher uses.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash the file at `path`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `path` is empty
    /// - `NotFound` / `PermissionDenied` if the file cannot be opened
    /// - `Io` if reading fails part way through
    pub fn hash_path(&self, path: &Path) -> Result<ContentDigest, HashError> {
        if path.as_os_str().is_empty() {
            return Err(HashError::InvalidArgument("file path is empty"));
        }

        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let digest = self
            .hash_reader(file)
            .map_err(|e| HashError::from_io(path, e))?;

        log::trace!("{} {} {}", self.algorithm, digest, path.display());
        Ok(digest)
    }

    /// Hash everything `reader` yields until EOF.
    ///
    /// # Errors
    ///
    /// Propagates the first read error other than `Interrupted`.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<ContentDigest> {
        let mut buffer = vec![0u8; BUFFER_SIZE];

        match self.algorithm {
            HashAlgorithm::Blake3 => {
                let mut state = blake3::Hasher::new();
                stream_chunks(&mut reader, &mut buffer, |chunk| {
                    state.update(chunk);
                })?;
                Ok(ContentDigest::from_bytes(state.finalize().as_bytes().to_vec()))
            }
            HashAlgorithm::Sha256 => {
                let mut state = sha2::Sha256::new();
                stream_chunks(&mut reader, &mut buffer, |chunk| state.update(chunk))?;
                Ok(ContentDigest::from_bytes(state.finalize().to_vec()))
            }
        }
    }
}

impl FileHasher for Hasher {
    fn compute_hash(&self, file: &FileRecord) -> Result<ContentDigest, HashError> {
        self.hash_path(&file.path)
    }
}

fn stream_chunks<R: Read>(
    reader: &mut R,
    buffer: &mut [u8],
    mut update: impl FnMut(&[u8]),
) -> io::Result<()> {
    loop {
        let read = match reader.read(buffer) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        update(&buffer[..read]);
    }
}
