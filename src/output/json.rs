//! JSON output formatter for scan and cleanup results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "algorithm": "blake3",
//!   "duplicates": [
//!     {
//!       "digest": "AF13...",
//!       "size": 1024,
//!       "reclaimable": 1024,
//!       "files": ["/path/keep.txt", "/path/copy.txt"]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 1024,
//!     "scan_duration_ms": 12,
//!     "errors": [],
//!     "exit_code": 0,
//!     "exit_code_name": "DS000"
//!   },
//!   "deletions": null
//! }
//! ```
//!
//! `deletions` is filled in by `clean` with one entry per attempted file.

use std::io::Write;

use serde::Serialize;

use crate::actions::{DeletionOutcome, DeletionSummary};
use crate::duplicates::{DuplicateGroup, DuplicateMap, ScanSummary};
use crate::error::ExitCode;
use crate::scanner::HashAlgorithm;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Uppercase hex digest
    pub digest: String,
    /// Size of each member in bytes
    pub size: u64,
    /// Bytes freed by removing every member but the first
    pub reclaimable: u64,
    /// Member paths, keeper first
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            digest: group.digest.clone(),
            size: group.size(),
            reclaimable: group.reclaimable_bytes(),
            files: group
                .files
                .iter()
                .map(|f| f.path.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// A file skipped during the scan.
#[derive(Debug, Clone, Serialize)]
pub struct JsonScanError {
    pub path: String,
    pub message: String,
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Files returned by the enumerator
    pub total_files: usize,
    /// Zero-length files (never hashed)
    pub empty_files: usize,
    /// Files whose digest was computed
    pub hashed_files: usize,
    /// Bytes read while hashing
    pub bytes_hashed: u64,
    /// Groups of identical files
    pub duplicate_groups: usize,
    /// Duplicate files excluding the keeper of each group
    pub duplicate_files: usize,
    /// Bytes that cleanup would free
    pub reclaimable_space: u64,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// Files skipped because they could not be read
    pub errors: Vec<JsonScanError>,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DS000")
    pub exit_code_name: String,
}

impl JsonSummary {
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            empty_files: summary.empty_files,
            hashed_files: summary.hashed_files,
            bytes_hashed: summary.bytes_hashed,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
            errors: summary
                .errors
                .iter()
                .map(|(path, message)| JsonScanError {
                    path: path.to_string_lossy().into_owned(),
                    message: message.clone(),
                })
                .collect(),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Cleanup results in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDeletionReport {
    /// True when nothing was actually deleted
    pub dry_run: bool,
    /// Files removed
    pub deleted: usize,
    /// Files that could not be removed
    pub failed: usize,
    /// Bytes freed
    pub bytes_freed: u64,
    /// One entry per file submitted for deletion
    pub outcomes: Vec<DeletionOutcome>,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Digest algorithm used for the scan
    pub algorithm: HashAlgorithm,
    /// Duplicate groups in digest order
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
    /// Cleanup results, when a cleanup ran
    pub deletions: Option<JsonDeletionReport>,
}

impl JsonOutput {
    /// Create a new JSON output from duplicate groups, summary and exit code.
    ///
    /// # Example
    ///
    /// ```
    /// use dupesweep::duplicates::{DuplicateMap, ScanSummary};
    /// use dupesweep::error::ExitCode;
    /// use dupesweep::output::json::JsonOutput;
    /// use dupesweep::scanner::HashAlgorithm;
    ///
    /// let output = JsonOutput::new(
    ///     HashAlgorithm::Blake3,
    ///     &DuplicateMap::new(),
    ///     &ScanSummary::default(),
    ///     ExitCode::NoDuplicates,
    /// );
    /// assert!(output.duplicates.is_empty());
    /// assert!(output.to_json().unwrap().contains("\"DS002\""));
    /// ```
    #[must_use]
    pub fn new(
        algorithm: HashAlgorithm,
        groups: &DuplicateMap,
        summary: &ScanSummary,
        exit_code: ExitCode,
    ) -> Self {
        Self {
            algorithm,
            duplicates: groups
                .values()
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
            deletions: None,
        }
    }

    /// Attach cleanup results.
    #[must_use]
    pub fn with_deletions(mut self, outcomes: &[DeletionOutcome], dry_run: bool) -> Self {
        let totals = DeletionSummary::from_outcomes(outcomes);
        self.deletions = Some(JsonDeletionReport {
            dry_run,
            deleted: if dry_run { 0 } else { totals.success_count },
            failed: if dry_run { 0 } else { totals.failure_count },
            bytes_freed: totals.bytes_freed,
            outcomes: outcomes.to_vec(),
        });
        self
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), serde_json::Error> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer).map_err(serde_json::Error::io)
    }
}
