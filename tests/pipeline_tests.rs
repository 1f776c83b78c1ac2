//! End-to-end pipeline tests on temporary trees: walk, hash, collect, cross-reference.

use dupwalk::pipeline::Executor;
use dupwalk::report::write_groups;
use dupwalk::scan::scan_dir_with;
use dupwalk::{
    HashIndex, IgnoreSet, ScanOpts, compare_dirs, cross_reference, find_duplicates, scan_dir,
    sorted_groups,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

fn write(root: &Path, rel: &str, contents: &[u8]) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

fn default_opts() -> ScanOpts {
    ScanOpts {
        ignore: IgnoreSet::with_defaults(),
        ..Default::default()
    }
}

/// Groups as sets of paths, independent of discovery order.
fn group_sets(index: &HashIndex) -> BTreeSet<BTreeSet<PathBuf>> {
    index
        .values()
        .map(|paths| paths.iter().cloned().collect())
        .collect()
}

fn all_paths(index: &HashIndex) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = index.values().flatten().cloned().collect();
    paths.sort();
    paths
}

#[test]
fn test_duplicate_report_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let x1 = write(root, "a/x.txt", b"same bytes");
    let x2 = write(root, "b/x.txt", b"same bytes");
    write(root, "a/empty.txt", b"");
    write(root, "a/.git/ignored.txt", b"same bytes");

    let index = find_duplicates(root, &default_opts()).unwrap();
    let dups = sorted_groups(&index, true);
    assert_eq!(dups.len(), 1);
    let members: BTreeSet<PathBuf> = dups[0].1.iter().cloned().collect();
    assert_eq!(members, BTreeSet::from([x1, x2]));

    let mut out = Vec::new();
    write_groups(&mut out, &index, true, false).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with(&format!("{} 2\n", dups[0].0.short_id())));
    assert!(!text.contains("empty.txt"));
    assert!(!text.contains(".git"));
}

#[test]
fn test_every_admissible_file_hashed_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let mut expected = Vec::new();
    for d in 0..6 {
        for f in 0..15 {
            let rel = format!("d{d}/sub{}/f{f}.bin", f % 3);
            expected.push(write(root, &rel, format!("{}", f % 5).as_bytes()));
        }
    }
    write(root, "d0/zero", b"");
    write(root, "d1/.DS_Store", b"finder");
    expected.sort();

    let (index, totals) = scan_dir(root, &default_opts()).unwrap();
    assert_eq!(all_paths(&index), expected);
    assert_eq!(totals.hashed, expected.len());
    // .DS_Store is seen and counted but not hashed; the empty file is not counted.
    assert_eq!(totals.files, expected.len() + 1);
    assert_eq!(index.len(), 5);
}

#[test]
fn test_ignored_dirs_contribute_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let kept = write(root, "src/main.c", b"int main;");
    write(root, "Tool.app/Contents/bin", b"int main;");
    write(root, "vendor/deep/nested/main.c", b"int main;");

    let mut opts = default_opts();
    opts.ignore.add_dir(root.join("vendor"));
    let (index, _) = scan_dir(root, &opts).unwrap();
    assert_eq!(all_paths(&index), vec![kept]);
}

#[test]
fn test_repeat_runs_give_same_groups() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for i in 0..40 {
        write(root, &format!("t{}/f{i}", i % 4), format!("{}", i % 7).as_bytes());
    }
    let opts = default_opts();
    let (first, _) = scan_dir(root, &opts).unwrap();
    let (second, _) = scan_dir(root, &opts).unwrap();
    assert_eq!(group_sets(&first), group_sets(&second));
    let first_keys: BTreeSet<_> = first.keys().collect();
    let second_keys: BTreeSet<_> = second.keys().collect();
    assert_eq!(first_keys, second_keys);
}

#[test]
fn test_permits_never_exceed_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for d in 0..8 {
        for f in 0..25 {
            write(root, &format!("d{d}/f{f}"), &[d as u8, f as u8]);
        }
    }
    // More threads than permits, so only the permits hold the bound.
    let exec = Executor::with_threads(3, 16).unwrap();
    assert_eq!(exec.pool.current_num_threads(), 16);
    let (index, _) = scan_dir_with(root, &default_opts(), &exec).unwrap();
    assert_eq!(index.values().map(Vec::len).sum::<usize>(), 200);
    assert!(exec.limiter.peak() >= 1);
    assert!(exec.limiter.peak() <= 3);
    assert_eq!(exec.limiter.in_flight(), 0);
}

#[test]
fn test_single_permit_still_finishes() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "a/b/c/d/e", b"deep");
    write(root, "a/b/x", b"deep");
    let exec = Executor::new(1).unwrap();
    let (index, _) = scan_dir_with(root, &default_opts(), &exec).unwrap();
    assert_eq!(sorted_groups(&index, true).len(), 1);
}

/// A chain of `depth` directories named `name` under `root`, created one level at a time
/// through open directory handles so no single call sees the full, overlong path.
#[cfg(unix)]
fn make_dir_chain(root: &Path, name: &str, depth: usize) {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let root_c = CString::new(root.as_os_str().as_bytes()).unwrap();
    let name_c = CString::new(name).unwrap();
    unsafe {
        let mut fd = libc::open(root_c.as_ptr(), libc::O_RDONLY | libc::O_DIRECTORY);
        assert!(fd >= 0);
        for _ in 0..depth {
            assert_eq!(libc::mkdirat(fd, name_c.as_ptr(), 0o755), 0);
            let next = libc::openat(fd, name_c.as_ptr(), libc::O_RDONLY | libc::O_DIRECTORY);
            assert!(next >= 0);
            libc::close(fd);
            fd = next;
        }
        libc::close(fd);
    }
}

/// Tree whose walk hits a path longer than the OS allows (a non-NotFound error, even as root),
/// next to plenty of ordinary work.
#[cfg(unix)]
fn tree_with_overlong_chain(root: &Path, name: &str) {
    for d in 0..10 {
        for f in 0..50 {
            write(root, &format!("bulk{d}/f{f}"), format!("{d}-{f}").as_bytes());
        }
    }
    // 25 levels of 200 bytes is past PATH_MAX on Linux and macOS.
    fs::create_dir_all(root.join("deep")).unwrap();
    make_dir_chain(&root.join("deep"), name, 25);
}

#[cfg(unix)]
#[test]
fn test_fatal_error_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let name = "n".repeat(200);
    tree_with_overlong_chain(root, &name);

    let opts = ScanOpts {
        workers: Some(2),
        ..default_opts()
    };
    let err = scan_dir(root, &opts).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.starts_with("read directory "), "{msg}");
    assert!(msg.contains(&name), "{msg}");
    assert!(msg.contains(&root.join("deep").display().to_string()), "{msg}");
}

#[cfg(unix)]
#[test]
fn test_fatal_error_in_second_tree_aborts_compare() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("A");
    let b = dir.path().join("B");
    write(&a, "p.txt", b"hello");
    let name = "m".repeat(200);
    tree_with_overlong_chain(&b, &name);

    let err = compare_dirs(&a, &b, &default_opts()).unwrap_err();
    assert!(format!("{:#}", err).contains(&name));
}

#[test]
fn test_missing_root_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(scan_dir(&dir.path().join("nope"), &default_opts()).is_err());
}

// --- two trees ---

#[test]
fn test_two_tree_missing_mode_example() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("A");
    let b = dir.path().join("B");
    let p = write(&a, "p.txt", b"hello");
    let q = write(&b, "q.txt", b"hello");

    let cmp = compare_dirs(&a, &b, &default_opts()).unwrap();
    assert!(cmp.a_only.is_empty());
    assert_eq!(cmp.matches.len(), 1);
    assert_eq!(cmp.matches[0].path, p);
    assert_eq!(cmp.matches[0].others, vec![q.clone()]);

    fs::remove_file(&q).unwrap();
    let cmp = compare_dirs(&a, &b, &default_opts()).unwrap();
    assert!(cmp.matches.is_empty());
    assert_eq!(cmp.a_only.len(), 1);
    assert_eq!(cmp.a_only[0].0, p);
}

#[test]
fn test_two_tree_complement_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("A");
    let b = dir.path().join("B");
    for i in 0..30 {
        write(&a, &format!("s{}/f{i}", i % 3), format!("{i}").as_bytes());
    }
    for i in (0..30).step_by(2) {
        write(&b, &format!("copy/f{i}"), format!("{i}").as_bytes());
    }

    let cmp = compare_dirs(&a, &b, &default_opts()).unwrap();
    assert_eq!(cmp.matches.len(), 15);
    assert_eq!(cmp.a_only.len(), 15);
    let mut seen: Vec<PathBuf> = cmp
        .matches
        .iter()
        .map(|m| m.path.clone())
        .chain(cmp.a_only.iter().map(|(p, _)| p.clone()))
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 30);
}

#[test]
fn test_two_tree_excluded_subtree_never_matches() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("A");
    let b = dir.path().join("B");
    let p = write(&a, "p.txt", b"hello");
    write(&b, "scratch/p.txt", b"hello");

    let mut opts = default_opts();
    opts.ignore.add_dir(b.join("scratch"));
    let cmp = compare_dirs(&a, &b, &opts).unwrap();
    assert!(cmp.matches.is_empty());
    assert_eq!(cmp.a_only[0].0, p);
}

#[test]
fn test_nested_tree_walked_once() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("A");
    let b = a.join("inner");
    let p = write(&a, "p.txt", b"outer");
    write(&b, "q.txt", b"inner");

    let indices = dupwalk::compare::compare_dirs(&a, &b, &default_opts()).unwrap();
    assert_eq!(indices.a.len(), 1);
    assert!(indices.a.contains_key(&p));
    assert_eq!(indices.b_totals.hashed, 1);

    let cmp = cross_reference(&indices.a, &indices.b, &[]);
    assert_eq!(cmp.a_only.len(), 1);
}

#[test]
fn test_same_dir_twice_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "f", b"x");
    let err = compare_dirs(dir.path(), dir.path(), &default_opts()).unwrap_err();
    assert!(err.to_string().contains("same directory"));
}
