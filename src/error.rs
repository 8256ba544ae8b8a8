//! Structured error handling and exit codes.
//!
//! Library modules define their own `thiserror` enums
//! ([`crate::scanner::HashError`], [`crate::scanner::ScanError`],
//! [`crate::duplicates::FinderError`], [`crate::actions::DeleteError`]).
//! This module holds what the binary needs on top: process exit codes and
//! a JSON-friendly error shape.

use serde::Serialize;

/// Exit codes for the dupesweep binary.
///
/// - 0: Success (duplicates found, or every deletion succeeded)
/// - 1: General error (scan aborted, bad arguments)
/// - 2: No duplicates found
/// - 3: Partial success (some deletions failed or files were skipped)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the command completed normally.
    Success = 0,
    /// General error: an unexpected failure occurred.
    GeneralError = 1,
    /// No duplicates: the scan completed but found nothing to report.
    NoDuplicates = 2,
    /// Partial success: completed, with per-file failures.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::NoDuplicates => "DS002",
            Self::PartialSuccess => "DS003",
        }
    }
}

/// Structured error information for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
