//! File actions module.
//!
//! This module provides functionality for:
//! - Deleting files with per-file outcome reporting ([`delete`])
//! - Cleaning duplicate groups down to one copy each ([`clean`])
//!
//! # Deletion
//!
//! Files go to the system trash by default and can be recovered from
//! there. Permanent deletion must be requested explicitly.
//!
//! ```no_run
//! use dupesweep::actions::DuplicateCleaner;
//! use std::path::Path;
//!
//! let cleaner = DuplicateCleaner::with_defaults();
//! for outcome in cleaner.clear_duplicates(Path::new("/path/to/photos")).unwrap() {
//!     println!("{} -> {}", outcome.path.display(), outcome.success);
//! }
//! ```

pub mod clean;
pub mod delete;

// Re-export commonly used types
pub use clean::{plan_deletions, DuplicateCleaner};
pub use delete::{
    delete_to_trash, permanent_delete, validate_preserves_copy, DeleteConfig, DeleteError,
    DeleteProgressCallback, Deleter, DeletionOutcome, DeletionSummary, FileDeleter,
};
