//! Dupwalk: find files with identical contents, within one directory tree or across two

pub mod compare;
pub mod engine;
pub mod pipeline;
pub mod report;
pub mod scan;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use compare::{CompareIndices, cross_reference};
pub use scan::{scan_dir, sorted_groups};

use log::debug;
use std::path::Path;

/// Result alias used by public dupwalk API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single-tree entry point: index `root` and return its digest → paths map.
///
/// Every regular, non-empty, non-ignored file appears exactly once. Use
/// [`sorted_groups`] with `dups_only = true` to keep only real duplicates.
pub fn find_duplicates(root: &Path, opts: &ScanOpts) -> Result<HashIndex> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    scan::scan_dir(root, opts).map(|(index, _)| index)
}

/// Two-tree entry point: index `a` and `b` concurrently and split A's files into those whose
/// contents also exist in B and those that do not.
///
/// B paths under any `opts.ignore.dirs` entry never count as matches.
pub fn compare_dirs(a: &Path, b: &Path, opts: &ScanOpts) -> Result<Comparison> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    let indices = compare::compare_dirs(a, b, opts)?;
    let exclude = opts.ignore.sorted_dirs();
    Ok(cross_reference(&indices.a, &indices.b, &exclude))
}

/// Default permit budget for this machine: 4 tasks per available thread, capped by the
/// open-file limit.
pub fn default_workers() -> usize {
    pipeline::resolve_capacity(None)
}
