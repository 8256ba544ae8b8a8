//! Duplicate cleanup: turn duplicate groups into deletions.
//!
//! The cleaner keeps the first member of every group (the first file the
//! enumerator produced), submits every other member to a [`FileDeleter`] in
//! one batch, and hands back the per-file outcomes. A failed deletion never
//! turns into an error here; callers inspect the individual outcomes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::delete::{validate_preserves_copy, DeleteConfig, Deleter, DeletionOutcome, FileDeleter};
use crate::duplicates::{DuplicateFinder, DuplicateMap, FinderError};

/// Select the files to delete: every member of every group except the first.
///
/// Output order is group order, then member order within each group.
/// Groups with fewer than two members are skipped. When a group's selection
/// would leave no surviving copy (a path listed more than once), its
/// candidates are still listed but already marked failed, and
/// [`DuplicateCleaner::clear_groups`] never hands them to the deleter.
#[must_use]
pub fn plan_deletions(groups: &DuplicateMap) -> Vec<DeletionOutcome> {
    let mut planned = Vec::new();

    for (digest, group) in groups {
        if group.len() <= 1 {
            continue;
        }

        let selected: Vec<PathBuf> = group.candidates().iter().map(|f| f.path.clone()).collect();
        let members: Vec<PathBuf> = group.files.iter().map(|f| f.path.clone()).collect();
        let refusal = validate_preserves_copy(&selected, &members).err();
        if let Some(e) = &refusal {
            log::error!("Refusing group {}: {}", digest, e);
        }

        planned.extend(group.candidates().iter().map(|f| {
            let mut outcome = DeletionOutcome::pending(f.path.clone(), f.size);
            if let Some(e) = &refusal {
                outcome.mark_failed(e.to_string());
            }
            outcome
        }));
    }

    planned
}

/// Finds duplicates under a directory and deletes all but one copy of each.
pub struct DuplicateCleaner {
    finder: DuplicateFinder,
    deleter: Arc<dyn FileDeleter>,
}

impl DuplicateCleaner {
    /// Create a cleaner from its collaborators.
    #[must_use]
    pub fn new(finder: DuplicateFinder, deleter: Arc<dyn FileDeleter>) -> Self {
        Self { finder, deleter }
    }

    /// Default finder, deleting to the system trash.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            DuplicateFinder::with_defaults(),
            Arc::new(Deleter::new(DeleteConfig::trash())),
        )
    }

    /// The finder used by [`clear_duplicates`](Self::clear_duplicates).
    #[must_use]
    pub fn finder(&self) -> &DuplicateFinder {
        &self.finder
    }

    /// Scan `directory` and delete every duplicate but the first of each group.
    ///
    /// Returns one outcome per deleted-or-attempted file.
    ///
    /// # Errors
    ///
    /// Only scan failures are errors (see [`DuplicateFinder::find_duplicates`]);
    /// per-file deletion failures are reported in the outcomes.
    pub fn clear_duplicates(&self, directory: &Path) -> Result<Vec<DeletionOutcome>, FinderError> {
        let groups = self.finder.find_duplicates(directory)?;
        Ok(self.clear_groups(&groups))
    }

    /// Delete duplicates from groups that were already found.
    ///
    /// The whole batch is handed to the deleter in a single call.
    /// Candidates of refused groups come back failed without being submitted.
    #[must_use]
    pub fn clear_groups(&self, groups: &DuplicateMap) -> Vec<DeletionOutcome> {
        let planned = plan_deletions(groups);
        let refused: Vec<bool> = planned.iter().map(|o| o.error.is_some()).collect();
        let (mut batch, rejected): (Vec<_>, Vec<_>) =
            planned.into_iter().partition(|o| o.error.is_none());
        log::debug!(
            "Submitting {} duplicate(s) from {} group(s) for deletion",
            batch.len(),
            groups.len()
        );
        self.deleter.delete_files(&mut batch);

        // Restore plan order.
        let mut batch = batch.into_iter();
        let mut rejected = rejected.into_iter();
        refused
            .into_iter()
            .filter_map(|r| if r { rejected.next() } else { batch.next() })
            .collect()
    }
}
