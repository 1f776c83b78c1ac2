use anyhow::{Result, anyhow};
use crossbeam_channel::{bounded, never, select};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::{IgnoreSet, WalkTotals};

use super::collector::{Aggregate, spawn_collector};
use super::context::{Executor, WalkContext, WalkCounters};
use super::join::JoinTracker;
use super::walk::spawn_walk;

/// Everything needed to start one tree's walk.
pub struct PipelineSpec<'a> {
    pub root: &'a Path,
    pub ignore: Arc<IgnoreSet>,
    pub skip_root: Option<PathBuf>,
    /// Progress counter label; the counter is shown only when `verbose`.
    pub label: &'static str,
    /// Terminal line of the counter. Pipelines running together need different lines.
    pub position: u16,
    pub verbose: bool,
}

/// One running walk → hash → collect pipeline building an `A`.
pub struct Pipeline<A: Aggregate> {
    label: &'static str,
    ctx: Arc<WalkContext>,
    tracker: JoinTracker,
    collector: JoinHandle<(A, usize)>,
}

impl<A: Aggregate> Pipeline<A> {
    /// Start the collector, then the root walk. Returns without waiting.
    pub fn start(spec: PipelineSpec<'_>, exec: &Executor) -> Self {
        // Result buffer the size of the permit budget, so hash tasks rarely wait on the collector.
        let (results_tx, results_rx) = bounded(exec.limiter.capacity());
        let collector =
            spawn_collector::<A>(results_rx, spec.verbose, spec.label, spec.position);

        let ctx = Arc::new(WalkContext {
            root: spec.root.to_path_buf(),
            ignore: spec.ignore,
            skip_root: spec.skip_root,
            exec: exec.clone(),
            results: results_tx,
            counters: WalkCounters::default(),
        });

        let tracker = JoinTracker::new();
        debug!("{}: walk started at {}", spec.label, ctx.root.display());
        spawn_walk(&ctx, ctx.root.clone(), tracker.add());

        Self {
            label: spec.label,
            ctx,
            tracker,
            collector,
        }
    }

    pub fn tracker(&self) -> &JoinTracker {
        &self.tracker
    }

    /// Wait for the walk, close the result stream and take the collector's index.
    /// Call once the run is known not to be aborted.
    pub fn finish(self) -> Result<(A, WalkTotals)> {
        self.tracker.wait();
        debug!("{}: walk ended", self.label);

        let ctx = self.ctx;
        let seen = ctx.counters.totals(0);
        // Our handle is the last holder of the sender; dropping it closes the result stream.
        drop(ctx);
        let (index, hashed) = self
            .collector
            .join()
            .map_err(|_| anyhow!("{}: collector thread panicked", self.label))?;
        Ok((index, WalkTotals { hashed, ..seen }))
    }
}

/// Block until `pipeline` finishes or the run aborts, then return its index.
pub fn run_to_completion<A: Aggregate>(
    pipeline: Pipeline<A>,
    exec: &Executor,
) -> Result<(A, WalkTotals)> {
    select! {
        recv(pipeline.tracker().done()) -> _ => {},
        recv(exec.abort.notified()) -> _ => {},
    }
    exec.abort.check()?;
    pipeline.finish()
}

/// Block until both pipelines finish or the run aborts. An abort from either tree returns at once.
pub fn run_pair_to_completion<A: Aggregate, B: Aggregate>(
    first: Pipeline<A>,
    second: Pipeline<B>,
    exec: &Executor,
) -> Result<((A, WalkTotals), (B, WalkTotals))> {
    let mut first_done = first.tracker().outstanding() == 0;
    let mut second_done = second.tracker().outstanding() == 0;
    while !(first_done && second_done) {
        let first_rx = if first_done {
            never()
        } else {
            first.tracker().done().clone()
        };
        let second_rx = if second_done {
            never()
        } else {
            second.tracker().done().clone()
        };
        select! {
            recv(first_rx) -> _ => first_done = true,
            recv(second_rx) -> _ => second_done = true,
            recv(exec.abort.notified()) -> _ => break,
        }
    }
    exec.abort.check()?;
    Ok((first.finish()?, second.finish()?))
}
