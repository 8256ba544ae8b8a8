//! CSV output formatter for scan and cleanup results.
//!
//! Scan results produce one row per file in a duplicate group:
//!
//! - `group_id`: 1-based group number, in digest order
//! - `digest`: uppercase hex content digest
//! - `path`: file path
//! - `size`: file size in bytes
//! - `keeper`: `true` for the copy cleanup would keep
//!
//! Cleanup results produce one row per attempted deletion with the columns
//! `path`, `size`, `success` and `error`.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::duplicates::DuplicateFinder;
//! use dupesweep::output::csv::CsvOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let groups = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! CsvOutput::new(&groups).write_to(std::io::stdout()).unwrap();
//! ```

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::actions::DeletionOutcome;
use crate::duplicates::DuplicateMap;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct GroupRow<'a> {
    group_id: usize,
    digest: &'a str,
    path: String,
    size: u64,
    keeper: bool,
}

#[derive(Debug, Serialize)]
struct OutcomeRow<'a> {
    path: String,
    size: u64,
    success: bool,
    error: &'a str,
}

/// CSV output formatter for duplicate groups.
pub struct CsvOutput<'a> {
    groups: &'a DuplicateMap,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a DuplicateMap) -> Self {
        Self { groups }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, group) in self.groups.values().enumerate() {
            for (member, file) in group.files.iter().enumerate() {
                csv_writer.serialize(GroupRow {
                    group_id: idx + 1,
                    digest: &group.digest,
                    path: file.path.to_string_lossy().into_owned(),
                    size: file.size,
                    keeper: member == 0,
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Write one row per deletion outcome.
///
/// # Errors
///
/// Returns `CsvOutputError` if writing or serialization fails.
pub fn write_outcomes<W: io::Write>(
    outcomes: &[DeletionOutcome],
    writer: W,
) -> Result<(), CsvOutputError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for outcome in outcomes {
        csv_writer.serialize(OutcomeRow {
            path: outcome.path.to_string_lossy().into_owned(),
            size: outcome.size,
            success: outcome.success,
            error: outcome.error.as_deref().unwrap_or(""),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}
