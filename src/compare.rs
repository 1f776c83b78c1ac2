//! Two-tree comparison: which files of A also exist (by content) in B, and which do not.

use anyhow::{Result, bail};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::engine::tools::{check_dir_exists, nested_root, remove_with_prefix, same_dir, sort_fold};
use crate::pipeline::{Executor, Pipeline, PipelineSpec, run_pair_to_completion};
use crate::{Comparison, HashIndex, Match, PathIndex, ScanOpts, WalkTotals};

/// Both indices of a compare run plus each tree's walk totals.
pub struct CompareIndices {
    /// Path → digest for A (the driving side).
    pub a: PathIndex,
    /// Digest → paths for B.
    pub b: HashIndex,
    pub a_totals: WalkTotals,
    pub b_totals: WalkTotals,
}

/// Walk `a` and `b` concurrently under one permit budget and build A's path index and
/// B's hash index.
///
/// `a` and `b` must be different directories; naming the same one twice is a configuration
/// error, reported before anything is walked.
pub fn compare_dirs(a: &Path, b: &Path, opts: &ScanOpts) -> Result<CompareIndices> {
    check_dir_exists(a)?;
    check_dir_exists(b)?;
    if same_dir(a, b) {
        bail!("same directory specified twice: {}", a.display());
    }
    let exec = Executor::for_workers(opts.workers)?;
    compare_dirs_with(a, b, opts, &exec)
}

/// [`compare_dirs`] on a caller-supplied executor. Does not repeat the argument checks.
pub fn compare_dirs_with(
    a: &Path,
    b: &Path,
    opts: &ScanOpts,
    exec: &Executor,
) -> Result<CompareIndices> {
    let start = Instant::now();
    let ignore = Arc::new(opts.ignore.clone());

    // A tree nested in the other is walked only as itself.
    let first = Pipeline::<PathIndex>::start(
        PipelineSpec {
            root: a,
            ignore: Arc::clone(&ignore),
            skip_root: nested_root(a, b),
            label: "Hashing A",
            position: 0,
            verbose: opts.verbose,
        },
        exec,
    );
    let second = Pipeline::<HashIndex>::start(
        PipelineSpec {
            root: b,
            ignore,
            skip_root: nested_root(b, a),
            label: "Hashing B",
            position: 1,
            verbose: opts.verbose,
        },
        exec,
    );

    let ((a_index, a_totals), (b_index, b_totals)) = run_pair_to_completion(first, second, exec)?;
    debug!(
        "compared {} ({} files) with {} ({} files) in {:.2}s",
        a.display(),
        a_index.len(),
        b.display(),
        b_totals.hashed,
        start.elapsed().as_secs_f64()
    );
    Ok(CompareIndices {
        a: a_index,
        b: b_index,
        a_totals,
        b_totals,
    })
}

/// Split A's paths into matches (digest present in B) and A-only, in case-insensitive path
/// order. B paths under any of `exclude` do not count; a match left with no B paths is A-only.
pub fn cross_reference(a: &PathIndex, b: &HashIndex, exclude: &[&Path]) -> Comparison {
    let mut keys: Vec<&PathBuf> = a.keys().collect();
    sort_fold(&mut keys);

    let mut comparison = Comparison::default();
    for path in keys {
        let digest = a[path];
        let others = match b.get(&digest) {
            Some(paths) if exclude.is_empty() => paths.clone(),
            Some(paths) => remove_with_prefix(paths, exclude),
            None => Vec::new(),
        };
        if others.is_empty() {
            comparison.a_only.push((path.clone(), digest));
        } else {
            comparison.matches.push(Match {
                path: path.clone(),
                digest,
                others,
            });
        }
    }
    comparison
}
