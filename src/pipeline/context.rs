//! Pipeline context and tuning: the shared executor (pool + permit budget + abort) and the
//! per-tree state every walk and hash task carries.

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engine::limiter::Limiter;
use crate::utils::config::TaskLimits;
use crate::utils::fd_limit::cap_by_fd_limit;
use crate::{IgnoreSet, PathRecord, WalkTotals};

use super::error_handler::AbortSignal;

/// Permit budget for a run: explicit override, else 4 per available thread capped by the FD limit.
pub fn resolve_capacity(workers: Option<usize>) -> usize {
    match workers {
        Some(n) => n.max(TaskLimits::FLOOR_TASKS),
        None => {
            let limits = TaskLimits::current();
            let wanted = limits.default_capacity();
            debug!(
                "available threads={}, tasks per thread={}",
                limits.all_threads, limits.per_thread
            );
            cap_by_fd_limit(wanted).max(limits.floor)
        }
    }
}

/// Where tasks run and what bounds them. One per run; both trees of a compare share it.
#[derive(Clone)]
pub struct Executor {
    pub pool: Arc<rayon::ThreadPool>,
    pub limiter: Limiter,
    pub abort: AbortSignal,
}

impl Executor {
    /// Pool with one thread per permit. With the pool no larger than the budget, the pool
    /// size alone already bounds in-flight work; the permits are what bound it when the pool
    /// is larger (see [`with_threads`](Self::with_threads)).
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_threads(capacity, capacity)
    }

    /// `capacity` permits over a pool of `threads` threads. Tasks beyond the budget park on
    /// [`Limiter::acquire`].
    pub fn with_threads(capacity: usize, threads: usize) -> Result<Self> {
        let limiter = Limiter::new(capacity);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("{}-task-{}", env!("CARGO_PKG_NAME"), i))
            .build()
            .context("build task thread pool")?;
        debug!(
            "in-flight task budget: {} over {} threads",
            limiter.capacity(),
            pool.current_num_threads()
        );
        Ok(Self {
            pool: Arc::new(pool),
            limiter,
            abort: AbortSignal::new(),
        })
    }

    /// Executor sized from `workers` (see [`resolve_capacity`]).
    pub fn for_workers(workers: Option<usize>) -> Result<Self> {
        Self::new(resolve_capacity(workers))
    }
}

/// Walk counters updated by tasks.
#[derive(Default)]
pub struct WalkCounters {
    pub dirs: AtomicUsize,
    pub files: AtomicUsize,
}

impl WalkCounters {
    pub fn totals(&self, hashed: usize) -> WalkTotals {
        WalkTotals {
            dirs: self.dirs.load(Ordering::Relaxed),
            files: self.files.load(Ordering::Relaxed),
            hashed,
        }
    }
}

/// Shared state for one tree's walk. Held in an `Arc` by every task of that tree; the
/// result stream closes when the last holder drops it.
pub struct WalkContext {
    pub root: PathBuf,
    pub ignore: Arc<IgnoreSet>,
    /// Another tree's root nested inside this one; skipped like an ignored directory.
    pub skip_root: Option<PathBuf>,
    pub exec: Executor,
    pub results: Sender<PathRecord>,
    pub counters: WalkCounters,
}
