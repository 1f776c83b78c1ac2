//! Path and ordering utilities

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Extension of a file or directory name, dot included: the suffix starting at the last `.`.
/// A dot-file such as `.git` is all extension. Returns None when the name has no dot.
pub fn dir_extension(name: &str) -> Option<&str> {
    name.rfind('.').map(|i| &name[i..])
}

/// Case-insensitive ordering for report output; ties broken by the exact bytes so the order is total.
pub fn fold_cmp(a: &Path, b: &Path) -> Ordering {
    let a = a.to_string_lossy();
    let b = b.to_string_lossy();
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(&b))
}

/// Sort paths with [`fold_cmp`].
pub fn sort_fold<P: AsRef<Path>>(paths: &mut [P]) {
    paths.sort_by(|a, b| fold_cmp(a.as_ref(), b.as_ref()));
}

/// Keep only paths not under any of `prefixes` (component-wise).
pub fn remove_with_prefix(paths: &[PathBuf], prefixes: &[&Path]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|p| !prefixes.iter().any(|pre| p.starts_with(pre)))
        .cloned()
        .collect()
}

/// Escape spaces the way a shell expects (`a b` → `a\ b`).
pub fn quote_path(path: &Path) -> String {
    path.display().to_string().replace(' ', "\\ ")
}

/// Render a path for output, optionally quoted.
pub fn display_path(path: &Path, quote: bool) -> String {
    if quote {
        quote_path(path)
    } else {
        path.display().to_string()
    }
}

/// True if `a` and `b` name the same directory. Compares canonical forms when both resolve,
/// the paths as given otherwise.
pub fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => a == b,
    }
}

/// If `inner` lies strictly inside `outer`, return `inner` expressed the way the walk of
/// `outer` will enumerate it (i.e. `outer` joined with the relative remainder).
pub fn nested_root(outer: &Path, inner: &Path) -> Option<PathBuf> {
    let outer_c = outer.canonicalize().ok()?;
    let inner_c = inner.canonicalize().ok()?;
    let rel = inner_c.strip_prefix(&outer_c).ok()?;
    if rel.as_os_str().is_empty() {
        return None;
    }
    Some(outer.join(rel))
}

/// Fail unless `path` is an existing directory.
pub fn check_dir_exists(path: &Path) -> Result<()> {
    let meta = std::fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("not a directory: {}", path.display());
    }
    Ok(())
}
