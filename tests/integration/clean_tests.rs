use dupesweep::actions::{
    plan_deletions, DeleteConfig, Deleter, DeletionOutcome, DeletionSummary, DuplicateCleaner,
    FileDeleter,
};
use dupesweep::duplicates::DuplicateFinder;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn permanent_cleaner() -> DuplicateCleaner {
    DuplicateCleaner::new(
        DuplicateFinder::with_defaults(),
        Arc::new(Deleter::new(DeleteConfig::permanent())),
    )
}

fn write(root: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Deleter that only records what it was asked to delete.
#[derive(Default)]
struct CountingDeleter {
    calls: Mutex<Vec<usize>>,
}

impl FileDeleter for CountingDeleter {
    fn delete_files(&self, outcomes: &mut [DeletionOutcome]) {
        self.calls.lock().unwrap().push(outcomes.len());
        for outcome in outcomes.iter_mut() {
            outcome.mark_deleted();
        }
    }
}

#[test]
fn test_distinct_files_delete_nothing() {
    let dir = TempDir::new().unwrap();
    let files = [
        write(dir.path(), "a.txt", b"one"),
        write(dir.path(), "b.txt", b"two"),
        write(dir.path(), "c.txt", b"three"),
    ];

    let outcomes = permanent_cleaner().clear_duplicates(dir.path()).unwrap();

    assert!(outcomes.is_empty());
    assert!(files.iter().all(|f| f.exists()));
}

#[test]
fn test_identical_files_keep_first() {
    let dir = TempDir::new().unwrap();
    let files: Vec<PathBuf> = (0..5)
        .map(|i| write(dir.path(), &format!("copy{i}.dat"), b"payload"))
        .collect();

    let outcomes = permanent_cleaner().clear_duplicates(dir.path()).unwrap();

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes.iter().all(|o| o.success && o.error.is_none()));
    assert!(files[0].exists());
    assert!(files[1..].iter().all(|f| !f.exists()));

    let summary = DeletionSummary::from_outcomes(&outcomes);
    assert_eq!(summary.success_count, 4);
    assert_eq!(summary.bytes_freed, 28);
}

#[test]
fn test_every_group_keeps_one_copy() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/1.txt", b"left");
    write(dir.path(), "b/1.txt", b"left");
    write(dir.path(), "a/2.txt", b"right");
    write(dir.path(), "b/2.txt", b"right");
    write(dir.path(), "c/2.txt", b"right");

    let outcomes = permanent_cleaner().clear_duplicates(dir.path()).unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(dir.path().join("a/1.txt").exists());
    assert!(dir.path().join("a/2.txt").exists());
    assert!(!dir.path().join("b/1.txt").exists());
    assert!(!dir.path().join("b/2.txt").exists());
    assert!(!dir.path().join("c/2.txt").exists());
}

#[test]
fn test_vanished_file_fails_alone() {
    let dir = TempDir::new().unwrap();
    let keeper = write(dir.path(), "a.txt", b"dup");
    let gone = write(dir.path(), "b.txt", b"dup");
    let other = write(dir.path(), "c.txt", b"dup");

    let cleaner = permanent_cleaner();
    let groups = cleaner.finder().find_duplicates(dir.path()).unwrap();
    fs::remove_file(&gone).unwrap();

    let outcomes = cleaner.clear_groups(&groups);

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].path, gone);
    assert!(!outcomes[0].success);
    assert!(outcomes[0].error.as_deref().unwrap().contains("not found"));
    assert_eq!(outcomes[1].path, other);
    assert!(outcomes[1].success);
    assert!(keeper.exists());
    assert!(!other.exists());
}

#[test]
fn test_plan_matches_cleanup_order() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "x1", b"x");
    write(dir.path(), "x2", b"x");
    write(dir.path(), "y1", b"yy");
    write(dir.path(), "y2", b"yy");
    write(dir.path(), "y3", b"yy");

    let deleter = Arc::new(CountingDeleter::default());
    let cleaner = DuplicateCleaner::new(DuplicateFinder::with_defaults(), deleter.clone());
    let groups = cleaner.finder().find_duplicates(dir.path()).unwrap();

    let planned: Vec<PathBuf> = plan_deletions(&groups).into_iter().map(|o| o.path).collect();
    let deleted: Vec<PathBuf> = cleaner
        .clear_groups(&groups)
        .into_iter()
        .map(|o| o.path)
        .collect();

    assert_eq!(planned, deleted);
    assert_eq!(planned.len(), 3);
    assert_eq!(*deleter.calls.lock().unwrap(), vec![3]);
}

#[test]
fn test_empty_and_unique_files_never_submitted() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "empty1", b"");
    write(dir.path(), "empty2", b"");
    write(dir.path(), "unique", b"solo");

    let deleter = Arc::new(CountingDeleter::default());
    let cleaner = DuplicateCleaner::new(DuplicateFinder::with_defaults(), deleter.clone());

    let outcomes = cleaner.clear_duplicates(dir.path()).unwrap();

    assert!(outcomes.is_empty());
    assert_eq!(*deleter.calls.lock().unwrap(), vec![0]);
    assert!(dir.path().join("empty1").exists());
    assert!(dir.path().join("empty2").exists());
}
