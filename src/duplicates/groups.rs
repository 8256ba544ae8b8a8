//! Duplicate grouping by content digest.
//!
//! # Overview
//!
//! This module holds the [`DuplicateGroup`] type and the pure grouping
//! step of duplicate detection: given files paired with their digests in
//! enumeration order, partition them by digest and keep only the groups
//! with two or more members.
//!
//! Groups are keyed by the uppercase hex rendering of the digest and stored
//! in a [`BTreeMap`], so iteration order is the ordinal order of the keys on
//! every platform. Within a group, members keep enumeration order and the
//! first member is the keeper.
//!
//! # Example
//!
//! ```
//! use dupesweep::duplicates::group_by_digest;
//! use dupesweep::scanner::{ContentDigest, FileRecord};
//!
//! let same = ContentDigest::from_bytes(vec![1, 3]);
//! let other = ContentDigest::from_bytes(vec![2, 4]);
//! let entries = vec![
//!     (FileRecord::new("/file1.txt", 5), same.clone()),
//!     (FileRecord::new("/file2.txt", 5), same),
//!     (FileRecord::new("/file3.txt", 9), other),
//! ];
//!
//! let (groups, stats) = group_by_digest(entries);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.duplicate_files, 2);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups["0103"].keeper().unwrap().path.to_str(), Some("/file1.txt"));
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::scanner::{ContentDigest, FileRecord};

/// Digest key -> group of files sharing that content.
pub type DuplicateMap = BTreeMap<String, DuplicateGroup>;

/// Files believed to be byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Uppercase hex digest shared by every member
    pub digest: String,
    /// Members in enumeration order; index 0 is the keeper
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Create a new group.
    #[must_use]
    pub fn new(digest: &ContentDigest, files: Vec<FileRecord>) -> Self {
        Self {
            digest: digest.to_key(),
            files,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this group has actual duplicates (2+ files).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.files.len() > 1
    }

    /// The file preserved during cleanup.
    #[must_use]
    pub fn keeper(&self) -> Option<&FileRecord> {
        self.files.first()
    }

    /// Every file except the keeper.
    #[must_use]
    pub fn candidates(&self) -> &[FileRecord] {
        self.files.get(1..).unwrap_or(&[])
    }

    /// Size of one copy in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.keeper().map_or(0, |f| f.size)
    }

    /// Total size of all copies in bytes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Space freed by removing all copies but the keeper.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.candidates().iter().map(|f| f.size).sum()
    }
}

/// Statistics from the grouping step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Files handed to the grouping step
    pub total_files: usize,
    /// Distinct digests seen
    pub unique_digests: usize,
    /// Groups with 2+ members
    pub duplicate_groups: usize,
    /// Files that belong to a duplicate group (keepers included)
    pub duplicate_files: usize,
}

/// Group files by digest, keeping only digests shared by 2+ files.
///
/// `entries` must be in enumeration order; that order is preserved inside
/// every group.
#[must_use]
pub fn group_by_digest<I>(entries: I) -> (DuplicateMap, GroupingStats)
where
    I: IntoIterator<Item = (FileRecord, ContentDigest)>,
{
    let mut stats = GroupingStats::default();
    let mut map = DuplicateMap::new();

    for (record, digest) in entries {
        stats.total_files += 1;
        map.entry(digest.to_key())
            .or_insert_with(|| DuplicateGroup::new(&digest, Vec::new()))
            .files
            .push(record);
    }

    stats.unique_digests = map.len();
    map.retain(|_, group| group.has_duplicates());
    stats.duplicate_groups = map.len();
    stats.duplicate_files = map.values().map(DuplicateGroup::len).sum();

    log::debug!(
        "Grouped {} files into {} digests, {} duplicate groups",
        stats.total_files,
        stats.unique_digests,
        stats.duplicate_groups
    );

    (map, stats)
}
