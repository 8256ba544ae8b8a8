//! Output formatters for scan and cleanup results.
//!
//! - [`text`]: colored listing for terminals
//! - [`json`]: a single JSON document for automation
//! - [`csv`]: one row per file for spreadsheets
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::duplicates::DuplicateFinder;
//! use dupesweep::error::ExitCode;
//! use dupesweep::output::JsonOutput;
//! use dupesweep::scanner::HashAlgorithm;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.scan(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(HashAlgorithm::Blake3, &groups, &summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

// Re-export main types
pub use csv::{CsvOutput, CsvOutputError};
pub use json::JsonOutput;
pub use text::TextOutput;
