//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Digest-based file grouping ([`groups`])
//! - Scan orchestration over pluggable enumerator and hasher ([`finder`])

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{group_by_digest, DuplicateGroup, DuplicateMap, GroupingStats};
