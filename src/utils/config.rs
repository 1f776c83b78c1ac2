//! Application configuration constants.
//! Tuning and defaults in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Name of the optional CLI config file (e.g. `.dupwalk.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Concurrency ----

/// Limits for the shared in-flight task budget.
///
/// Walk and hash tasks draw from one budget.
#[derive(Clone, Copy, Debug)]
pub struct TaskLimits {
    /// Available threads (from rayon); set by [`TaskLimits::current()`].
    pub all_threads: usize,
    /// In-flight tasks per available thread.
    pub per_thread: usize,
    /// Never go below this many in-flight tasks.
    pub floor: usize,
}

impl Default for TaskLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            per_thread: Self::TASKS_PER_THREAD,
            floor: Self::FLOOR_TASKS,
        }
    }
}

impl TaskLimits {
    pub const TASKS_PER_THREAD: usize = 4;
    pub const FLOOR_TASKS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Default capacity before any FD cap: `per_thread * all_threads`.
    pub fn default_capacity(&self) -> usize {
        (self.per_thread * self.all_threads).max(self.floor)
    }
}

// ---- Progress ----

/// Progress counter tuning.
pub struct ProgressConsts;

impl ProgressConsts {
    /// Records between counter refreshes (keeps the collector from redrawing per file).
    pub const PROGRESS_UPDATE_BATCH_SIZE: usize = 100;
}

// ---- Hashing ----

/// Hashing I/O sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// Chunk size for streaming file contents into the hasher (bytes). 1 MB.
    pub const HASH_READ_CHUNK_SIZE: usize = 1024 * 1024;
}

/// Number of trailing hex digits shown as a group's short ID.
pub const SHORT_ID_LEN: usize = 7;

// ---- Ignores ----

/// Built-in ignore lists used by [`IgnoreSet::with_defaults`](crate::IgnoreSet::with_defaults).
pub struct DefaultIgnores;

impl DefaultIgnores {
    /// Bundle-like or tool directories, matched by extension. `.git` and `.idea` have no
    /// stem, so the whole name is the extension.
    pub const DIR_EXTS: &'static [&'static str] = &[
        ".app",
        ".git",
        ".idea",
        ".pkg",
        ".lproj",
        ".pbproj",
        ".xcassets",
        ".framework",
        ".xcodeproj",
        ".xcworkspace",
        ".xcdatamodel",
    ];

    pub const FILES: &'static [&'static str] = &[".DS_Store", ".gitignore"];
}
