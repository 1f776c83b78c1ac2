use dupwalk::engine::tools::{dir_extension, nested_root, same_dir};
use dupwalk::engine::{
    display_path, fold_cmp, hash_bytes, hash_file, hash_reader, quote_path, remove_with_prefix,
    sort_fold,
};
use dupwalk::{
    Digest, HashIndex, IgnoreSet, PathIndex, cross_reference, default_workers, sorted_groups,
};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

// --- dir_extension ---

#[test]
fn test_dir_extension_last_dot() {
    assert_eq!(dir_extension("Foo.app"), Some(".app"));
    assert_eq!(dir_extension("a.b.framework"), Some(".framework"));
}

#[test]
fn test_dir_extension_dotfile_is_all_extension() {
    assert_eq!(dir_extension(".git"), Some(".git"));
}

#[test]
fn test_dir_extension_none() {
    assert_eq!(dir_extension("src"), None);
}

// --- IgnoreSet ---

#[test]
fn test_ignore_defaults_skip_git_and_bundles() {
    let ignore = IgnoreSet::with_defaults();
    assert!(ignore.skips_dir(Path::new("repo/.git")));
    assert!(ignore.skips_dir(Path::new("Apps/Mail.app")));
    assert!(!ignore.skips_dir(Path::new("repo/src")));
    assert!(ignore.skips_file(Path::new("photos/.DS_Store")));
    assert!(!ignore.skips_file(Path::new("photos/a.jpg")));
}

#[test]
fn test_ignore_empty_skips_nothing() {
    let ignore = IgnoreSet::default();
    assert!(!ignore.skips_dir(Path::new("repo/.git")));
    assert!(!ignore.skips_file(Path::new(".DS_Store")));
}

#[test]
fn test_ignore_exact_dir_path() {
    let mut ignore = IgnoreSet::default();
    ignore.add_dir("b/tmp");
    assert!(ignore.skips_dir(Path::new("b/tmp")));
    assert!(!ignore.skips_dir(Path::new("b/tmp2")));
    assert!(!ignore.skips_dir(Path::new("a/tmp")));
}

#[test]
fn test_ignore_ext_gets_leading_dot() {
    let mut ignore = IgnoreSet::default();
    ignore.add_dir_ext("bundle");
    assert!(ignore.dir_exts.contains(".bundle"));
    assert!(ignore.skips_dir(Path::new("x/Plugin.bundle")));
}

// --- Digest ---

#[test]
fn test_short_id_is_hex_suffix() {
    let d = hash_bytes(b"hello");
    let hex = d.to_hex();
    assert_eq!(hex.len(), 64);
    assert_eq!(d.short_id().len(), 7);
    assert!(hex.ends_with(&d.short_id()));
}

#[test]
fn test_digest_matches_blake3() {
    let d = hash_bytes(b"some contents");
    assert_eq!(d, Digest::from(blake3::hash(b"some contents")));
    assert_eq!(d.to_string(), blake3::hash(b"some contents").to_hex().to_string());
}

// --- hashing ---

#[test]
fn test_hash_reader_across_chunks() {
    // Larger than one read chunk.
    let data = vec![7u8; 3 * 1024 * 1024 + 17];
    let d = hash_reader(data.as_slice()).unwrap();
    assert_eq!(d, hash_bytes(&data));
}

#[test]
fn test_hash_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("f.txt");
    std::fs::write(&p, b"abc").unwrap();
    assert_eq!(hash_file(&p).unwrap(), Some(hash_bytes(b"abc")));
}

#[test]
fn test_hash_file_vanished_is_none() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(hash_file(&dir.path().join("gone")).unwrap(), None);
}

// --- ordering and rendering ---

#[test]
fn test_fold_cmp_ignores_case() {
    assert_eq!(fold_cmp(Path::new("Apple"), Path::new("banana")), Ordering::Less);
    assert_eq!(fold_cmp(Path::new("apple"), Path::new("Banana")), Ordering::Less);
    assert_ne!(fold_cmp(Path::new("a"), Path::new("A")), Ordering::Equal);
}

#[test]
fn test_sort_fold() {
    let mut paths = vec![
        PathBuf::from("c"),
        PathBuf::from("B"),
        PathBuf::from("a"),
    ];
    sort_fold(&mut paths);
    assert_eq!(
        paths,
        vec![PathBuf::from("a"), PathBuf::from("B"), PathBuf::from("c")]
    );
}

#[test]
fn test_quote_path_escapes_spaces() {
    assert_eq!(quote_path(Path::new("my dir/a b.txt")), "my\\ dir/a\\ b.txt");
    assert_eq!(display_path(Path::new("a b"), false), "a b");
    assert_eq!(display_path(Path::new("a b"), true), "a\\ b");
}

#[test]
fn test_remove_with_prefix_is_component_wise() {
    let paths = vec![
        PathBuf::from("b/tmp/x"),
        PathBuf::from("b/tmpfile"),
        PathBuf::from("b/keep"),
    ];
    let kept = remove_with_prefix(&paths, &[Path::new("b/tmp")]);
    assert_eq!(kept, vec![PathBuf::from("b/tmpfile"), PathBuf::from("b/keep")]);
}

// --- directory relations ---

#[test]
fn test_same_dir_through_dot_segments() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let a = dir.path().to_path_buf();
    let b = dir.path().join("sub").join("..");
    assert!(same_dir(&a, &b));
    assert!(!same_dir(&a, &dir.path().join("sub")));
}

#[test]
fn test_nested_root() {
    let dir = tempfile::tempdir().unwrap();
    let inner = dir.path().join("x").join("y");
    std::fs::create_dir_all(&inner).unwrap();
    assert_eq!(
        nested_root(dir.path(), &inner),
        Some(dir.path().join("x").join("y"))
    );
    assert_eq!(nested_root(&inner, dir.path()), None);
    assert_eq!(nested_root(dir.path(), dir.path()), None);
}

// --- grouping and cross-reference ---

fn d(byte: u8) -> Digest {
    Digest([byte; 32])
}

#[test]
fn test_sorted_groups_dups_only() {
    let mut index = HashIndex::new();
    index.insert(d(2), vec![PathBuf::from("x"), PathBuf::from("y")]);
    index.insert(d(1), vec![PathBuf::from("z")]);
    let all = sorted_groups(&index, false);
    assert_eq!(all.len(), 2);
    assert_eq!(*all[0].0, d(1));
    let dups = sorted_groups(&index, true);
    assert_eq!(dups.len(), 1);
    assert_eq!(*dups[0].0, d(2));
}

fn two_trees() -> (PathIndex, HashIndex) {
    let mut a = PathIndex::new();
    a.insert(PathBuf::from("a/Q.txt"), d(2));
    a.insert(PathBuf::from("a/p.txt"), d(1));
    a.insert(PathBuf::from("a/r.txt"), d(3));
    let mut b = HashIndex::new();
    b.insert(d(1), vec![PathBuf::from("b/p.txt")]);
    b.insert(d(3), vec![PathBuf::from("b/tmp/r.txt")]);
    (a, b)
}

#[test]
fn test_cross_reference_partitions_a() {
    let (a, b) = two_trees();
    let cmp = cross_reference(&a, &b, &[]);
    let matched: Vec<_> = cmp.matches.iter().map(|m| m.path.clone()).collect();
    assert_eq!(
        matched,
        vec![PathBuf::from("a/p.txt"), PathBuf::from("a/r.txt")]
    );
    assert_eq!(cmp.matches[0].others, vec![PathBuf::from("b/p.txt")]);
    assert_eq!(cmp.a_only, vec![(PathBuf::from("a/Q.txt"), d(2))]);
    assert_eq!(cmp.matches.len() + cmp.a_only.len(), a.len());
}

#[test]
fn test_cross_reference_exclusion_empties_match() {
    let (a, b) = two_trees();
    let cmp = cross_reference(&a, &b, &[Path::new("b/tmp")]);
    assert_eq!(cmp.matches.len(), 1);
    assert_eq!(cmp.matches[0].path, PathBuf::from("a/p.txt"));
    let a_only: Vec<_> = cmp.a_only.iter().map(|(p, _)| p.clone()).collect();
    assert_eq!(
        a_only,
        vec![PathBuf::from("a/Q.txt"), PathBuf::from("a/r.txt")]
    );
}

// --- capacity ---

#[test]
fn test_default_workers_within_thread_budget() {
    let workers = default_workers();
    assert!(workers >= 1);
    assert!(workers <= 4 * rayon::current_num_threads());
}
