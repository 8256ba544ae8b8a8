use dupesweep::duplicates::{DuplicateFinder, FinderConfig};
use dupesweep::scanner::{HashAlgorithm, Hasher, Walker, WalkerConfig};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn finder_with(config: FinderConfig, walker: WalkerConfig, algorithm: HashAlgorithm) -> DuplicateFinder {
    DuplicateFinder::new(
        Arc::new(Walker::new(walker)),
        Arc::new(Hasher::with_algorithm(algorithm)),
        config,
    )
}

fn write(root: &Path, name: &str, content: &[u8]) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn file_names(paths: impl Iterator<Item = std::path::PathBuf>, root: &Path) -> Vec<String> {
    paths
        .map(|p| {
            p.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn test_distinct_files_have_no_duplicates() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "one.txt", b"first");
    write(dir.path(), "two.txt", b"second");
    write(dir.path(), "three.txt", b"third");

    let (groups, summary) = DuplicateFinder::with_defaults().scan(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.hashed_files, 3);
    assert_eq!(summary.duplicate_groups, 0);
    assert_eq!(summary.reclaimable_space, 0);
}

#[test]
fn test_identical_files_form_one_group() {
    let dir = TempDir::new().unwrap();
    for name in ["d.txt", "b.txt", "a.txt", "c.txt"] {
        write(dir.path(), name, b"same content");
    }

    let groups = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    let (key, group) = groups.iter().next().unwrap();
    let expected = blake3::hash(b"same content").to_hex().to_uppercase();
    assert_eq!(key, &expected);
    assert_eq!(group.digest, expected);
    assert_eq!(
        file_names(group.files.iter().map(|f| f.path.clone()), dir.path()),
        vec!["a.txt", "b.txt", "c.txt", "d.txt"]
    );
    assert!(group.files.iter().all(|f| f.size == 12));
}

#[test]
fn test_groups_across_subdirectories_in_walk_order() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "z.txt", b"photo");
    write(dir.path(), "albums/2019/copy.jpg", b"photo");
    write(dir.path(), "albums/readme.md", b"notes");
    write(dir.path(), "notes.md", b"notes");
    write(dir.path(), "unique.bin", b"only once");

    let (groups, summary) = DuplicateFinder::with_defaults().scan(dir.path()).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(summary.duplicate_files, 2);
    assert_eq!(summary.reclaimable_space, 10);

    let photo = &groups[&blake3::hash(b"photo").to_hex().to_uppercase()];
    assert_eq!(
        file_names(photo.files.iter().map(|f| f.path.clone()), dir.path()),
        vec!["albums/2019/copy.jpg", "z.txt"]
    );
    let notes = &groups[&blake3::hash(b"notes").to_hex().to_uppercase()];
    assert_eq!(
        file_names(notes.files.iter().map(|f| f.path.clone()), dir.path()),
        vec!["albums/readme.md", "notes.md"]
    );
}

#[test]
fn test_group_keys_iterate_in_ordinal_order() {
    let dir = TempDir::new().unwrap();
    for i in 0..6u8 {
        write(dir.path(), &format!("{i}a.bin"), &[i; 5]);
        write(dir.path(), &format!("{i}b.bin"), &[i; 5]);
    }

    let groups = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    let keys: Vec<&String> = groups.keys().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(groups.len(), 6);
    assert_eq!(keys, sorted);
}

#[test]
fn test_sha256_keys() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"hello");
    write(dir.path(), "b.txt", b"hello");

    let finder = finder_with(
        FinderConfig::default(),
        WalkerConfig::default(),
        HashAlgorithm::Sha256,
    );
    let groups = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(
        groups.keys().next().unwrap(),
        "2CF24DBA5FB0A30E26E83B2AC5B9E29E1B161E5C1FA7425E73043362938B9824"
    );
}

#[test]
fn test_parallel_matches_sequential() {
    let dir = TempDir::new().unwrap();
    for i in 0..40 {
        let content = format!("content {}", i % 7);
        write(dir.path(), &format!("dir{}/file{:02}.txt", i % 3, i), content.as_bytes());
    }

    let sequential = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let parallel = finder_with(
        FinderConfig::default().with_io_threads(4),
        WalkerConfig::default(),
        HashAlgorithm::Blake3,
    )
    .find_duplicates(dir.path())
    .unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(sequential.len(), 7);
}

#[test]
fn test_skip_hidden_and_ignore_patterns() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "keep.txt", b"dup");
    write(dir.path(), ".hidden.txt", b"dup");
    write(dir.path(), "cache/copy.txt", b"dup");
    write(dir.path(), "scratch.tmp", b"dup");

    let finder = finder_with(
        FinderConfig::default(),
        WalkerConfig::new(true, vec!["cache/".to_string(), "*.tmp".to_string()]),
        HashAlgorithm::Blake3,
    );
    let (groups, summary) = finder.scan(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_root_gitignore_is_honored() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), ".gitignore", b"build/\n");
    write(dir.path(), "src.rs", b"fn main() {}");
    write(dir.path(), "build/src.rs", b"fn main() {}");

    let groups = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
}

#[test]
fn test_repeated_scans_are_stable() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "x/1.txt", b"alpha");
    write(dir.path(), "y/2.txt", b"alpha");
    write(dir.path(), "3.txt", b"alpha");

    let finder = DuplicateFinder::with_defaults();
    let first = finder.find_duplicates(dir.path()).unwrap();
    let second = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first, second);
}
