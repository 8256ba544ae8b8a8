use dupesweep::actions::plan_deletions;
use dupesweep::duplicates::group_by_digest;
use dupesweep::scanner::{ContentDigest, FileRecord, Hasher};
use proptest::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

proptest! {
    #[test]
    fn test_hash_determinism(content in prop::collection::vec(any::<u8>(), 0..4096)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.bin");
        fs::write(&path, &content).unwrap();

        let hasher = Hasher::new();
        let from_file = hasher.hash_path(&path).unwrap();
        let from_memory = hasher.hash_reader(content.as_slice()).unwrap();

        prop_assert_eq!(from_file.len(), 32);
        prop_assert_eq!(from_file, from_memory);
    }

    #[test]
    fn test_digest_key_parses_back(bytes in prop::collection::vec(any::<u8>(), 1..64)) {
        let digest = ContentDigest::from_bytes(bytes);
        let key = digest.to_key();

        prop_assert_eq!(key.len(), digest.len() * 2);
        prop_assert!(key.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        prop_assert_eq!(key.to_lowercase().parse::<ContentDigest>().unwrap(), digest);
    }

    #[test]
    fn test_group_by_digest_invariants(digests in prop::collection::vec(0u8..8, 0..60)) {
        let entries: Vec<(FileRecord, ContentDigest)> = digests
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                (
                    FileRecord::new(format!("/fake/path/{:03}", i), 10),
                    ContentDigest::from_bytes(vec![d]),
                )
            })
            .collect();

        let (groups, stats) = group_by_digest(entries.clone());

        let mut counts: HashMap<u8, usize> = HashMap::new();
        for d in &digests {
            *counts.entry(*d).or_default() += 1;
        }

        // Every group has 2+ members, all with the group's digest, in input order
        for (key, group) in &groups {
            prop_assert!(group.len() >= 2);
            prop_assert_eq!(key, &group.digest);
            let expected: Vec<PathBuf> = entries
                .iter()
                .filter(|(_, d)| &d.to_key() == key)
                .map(|(f, _)| f.path.clone())
                .collect();
            let actual: Vec<PathBuf> = group.files.iter().map(|f| f.path.clone()).collect();
            prop_assert_eq!(actual, expected);
        }

        // Exactly the digests seen twice or more become groups
        let repeated = counts.values().filter(|&&n| n >= 2).count();
        prop_assert_eq!(groups.len(), repeated);
        prop_assert_eq!(stats.total_files, digests.len());
        prop_assert_eq!(stats.unique_digests, counts.len());
        prop_assert_eq!(stats.duplicate_groups, repeated);
    }

    #[test]
    fn test_plan_never_deletes_every_copy(digests in prop::collection::vec(0u8..5, 0..40)) {
        let entries = digests.iter().enumerate().map(|(i, &d)| {
            (
                FileRecord::new(format!("/f/{:03}", i), 1),
                ContentDigest::from_bytes(vec![d]),
            )
        });
        let (groups, _) = group_by_digest(entries);

        let planned = plan_deletions(&groups);

        let total_members: usize = groups.values().map(|g| g.len()).sum();
        prop_assert_eq!(planned.len(), total_members - groups.len());
        for group in groups.values() {
            let keeper = &group.files[0].path;
            prop_assert!(planned.iter().all(|o| &o.path != keeper));
        }
    }
}
