//! Public and internal types for the dupwalk API and pipeline.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::engine::tools::dir_extension;
use crate::utils::config::{DefaultIgnores, SHORT_ID_LEN};

/// Content fingerprint of a file (blake3, 32 bytes).
///
/// Not collision resistant in any adversarial sense we rely on; two files with equal
/// digests are treated as having identical contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// Full lowercase hex rendering (64 chars).
    pub fn to_hex(&self) -> String {
        blake3::Hash::from_bytes(self.0).to_hex().to_string()
    }

    /// Trailing hex digits used as a display ID, git style. Ambiguous short IDs are fine:
    /// group membership is decided by the full digest.
    pub fn short_id(&self) -> String {
        let hex = self.to_hex();
        hex[hex.len() - SHORT_ID_LEN..].to_string()
    }
}

impl From<blake3::Hash> for Digest {
    fn from(h: blake3::Hash) -> Self {
        Digest(*h.as_bytes())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// One hashed file. Produced once per regular, non-empty, non-ignored file and moved to the collector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathRecord {
    pub path: PathBuf,
    pub digest: Digest,
}

/// Map of digest → paths sharing it, in discovery order.
pub type HashIndex = HashMap<Digest, Vec<PathBuf>>;

/// Map of path → digest for one tree (driving side of a two-tree compare).
pub type PathIndex = HashMap<PathBuf, Digest>;

/// What the walker skips. Built once before a run and only read during it.
#[derive(Clone, Debug, Default)]
pub struct IgnoreSet {
    /// Directory "extensions", dot included (e.g. `.git`, `.app`).
    pub dir_exts: HashSet<String>,
    /// Explicit directory paths, matched against enumerated paths as given.
    pub dirs: HashSet<PathBuf>,
    /// File basenames (e.g. `.DS_Store`).
    pub files: HashSet<String>,
}

impl IgnoreSet {
    /// Ignore set with the built-in extension and filename lists and no explicit paths.
    pub fn with_defaults() -> Self {
        Self {
            dir_exts: DefaultIgnores::DIR_EXTS.iter().map(|s| s.to_string()).collect(),
            dirs: HashSet::new(),
            files: DefaultIgnores::FILES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Add a directory extension; a missing leading dot is supplied.
    pub fn add_dir_ext(&mut self, ext: &str) {
        let ext = if ext.starts_with('.') {
            ext.to_string()
        } else {
            format!(".{ext}")
        };
        self.dir_exts.insert(ext);
    }

    pub fn add_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.insert(dir.into());
    }

    pub fn add_file(&mut self, name: impl Into<String>) {
        self.files.insert(name.into());
    }

    /// True if the directory at `path` (and so its whole subtree) is skipped.
    pub fn skips_dir(&self, path: &Path) -> bool {
        if let Some(ext) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(dir_extension)
            && self.dir_exts.contains(ext)
        {
            return true;
        }
        self.dirs.contains(path)
    }

    /// True if the regular file at `path` is skipped by basename.
    pub fn skips_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| self.files.contains(n))
    }

    /// Explicit directory paths, sorted, for report headers.
    pub fn sorted_dirs(&self) -> Vec<&Path> {
        let mut dirs: Vec<&Path> = self.dirs.iter().map(PathBuf::as_path).collect();
        dirs.sort();
        dirs
    }
}

/// Options for a walk. Used by [`find_duplicates`](crate::find_duplicates) and
/// [`compare_dirs`](crate::compare_dirs).
#[derive(Clone, Debug, Default)]
pub struct ScanOpts {
    /// What to skip while walking.
    pub ignore: IgnoreSet,
    /// Limiter capacity override. When None, derived from available parallelism and the FD limit.
    pub workers: Option<usize>,
    /// Show a progress counter on stderr while hashing.
    pub verbose: bool,
}

/// Full options (CLI). Use [`ScanOpts`] for lib.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    pub scan: ScanOpts,
    /// Report duplicates / matches only (otherwise all groups / files missing from the second tree).
    pub dups_only: bool,
    /// Escape spaces in rendered paths.
    pub quote: bool,
}

/// What the second tree is compared for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareMode {
    /// Report A paths whose contents also exist in B.
    Matches,
    /// Report A paths whose contents do not exist in B.
    Missing,
}

/// An A path whose digest also occurs in B, with the B paths holding it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub path: PathBuf,
    pub digest: Digest,
    pub others: Vec<PathBuf>,
}

/// Result of cross-referencing two trees. Both lists follow the fold order of A's paths,
/// and every A path lands in exactly one of them.
#[derive(Clone, Debug, Default)]
pub struct Comparison {
    pub matches: Vec<Match>,
    pub a_only: Vec<(PathBuf, Digest)>,
}

/// Counters kept during a walk (reported in verbose mode).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkTotals {
    /// Directories seen below the root, ignored ones included.
    pub dirs: usize,
    /// Regular non-empty files seen, ignored names included.
    pub files: usize,
    /// Files actually hashed into the index.
    pub hashed: usize,
}
