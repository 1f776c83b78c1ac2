//! Single-tree duplicate detection

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::engine::tools::check_dir_exists;
use crate::pipeline::{Executor, Pipeline, PipelineSpec, run_to_completion};
use crate::{Digest, HashIndex, ScanOpts, WalkTotals};

/// Hash every admissible file under `root` and group paths by digest.
pub fn scan_dir(root: &Path, opts: &ScanOpts) -> Result<(HashIndex, WalkTotals)> {
    check_dir_exists(root)?;
    let exec = Executor::for_workers(opts.workers)?;
    scan_dir_with(root, opts, &exec)
}

/// [`scan_dir`] on a caller-supplied executor (e.g. to share or inspect its limiter).
pub fn scan_dir_with(
    root: &Path,
    opts: &ScanOpts,
    exec: &Executor,
) -> Result<(HashIndex, WalkTotals)> {
    let start = Instant::now();
    let pipeline = Pipeline::<HashIndex>::start(
        PipelineSpec {
            root,
            ignore: Arc::new(opts.ignore.clone()),
            skip_root: None,
            label: "Hashing",
            position: 0,
            verbose: opts.verbose,
        },
        exec,
    );
    let (index, totals) = run_to_completion(pipeline, exec)?;
    debug!(
        "scanned {} in {:.2}s: {} dirs, {} files, {} hashed, {} distinct",
        root.display(),
        start.elapsed().as_secs_f64(),
        totals.dirs,
        totals.files,
        totals.hashed,
        index.len()
    );
    Ok((index, totals))
}

/// Groups of `index` in digest order; with `dups_only`, only groups of two or more paths.
pub fn sorted_groups(index: &HashIndex, dups_only: bool) -> Vec<(&Digest, &[PathBuf])> {
    let mut groups: Vec<(&Digest, &[PathBuf])> = index
        .iter()
        .filter(|(_, paths)| !dups_only || paths.len() > 1)
        .map(|(digest, paths)| (digest, paths.as_slice()))
        .collect();
    groups.sort_by(|a, b| a.0.cmp(b.0));
    groups
}
