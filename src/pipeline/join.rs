//! Completion barrier for dynamically spawned tasks.
//!
//! [`JoinTracker::add`] is called by the spawner, synchronously, before the task is handed to
//! the pool; the returned [`TaskToken`] moves into the task and decrements on drop. A task
//! spawns children while still holding its own token, so the count cannot reach zero until
//! every descendant is done. Reaching zero is signalled once on a channel.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct TrackerInner {
    outstanding: AtomicUsize,
    done_tx: Sender<()>,
}

/// Counts outstanding tasks for one pipeline.
pub struct JoinTracker {
    inner: Arc<TrackerInner>,
    done_rx: Receiver<()>,
}

/// Proof of one outstanding task. Dropping it marks the task done, on every exit path.
#[must_use = "dropping the token marks the task finished"]
pub struct TaskToken {
    inner: Arc<TrackerInner>,
}

impl Default for JoinTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl JoinTracker {
    pub fn new() -> Self {
        let (done_tx, done_rx) = bounded(1);
        Self {
            inner: Arc::new(TrackerInner {
                outstanding: AtomicUsize::new(0),
                done_tx,
            }),
            done_rx,
        }
    }

    /// Count one more task. Call in the spawning task, before spawning.
    pub fn add(&self) -> TaskToken {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        TaskToken {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Tasks not yet finished.
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    /// Becomes ready when the count drops to zero. Use in `select!`.
    pub fn done(&self) -> &Receiver<()> {
        &self.done_rx
    }

    /// Block until every counted task has finished. Returns at once if nothing was ever added.
    pub fn wait(&self) {
        if self.outstanding() == 0 {
            return;
        }
        let _ = self.done_rx.recv();
    }
}

impl TaskToken {
    /// Count a child task under the same tracker.
    pub fn add(&self) -> TaskToken {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        TaskToken {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Drop for TaskToken {
    fn drop(&mut self) {
        if self.inner.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            let _ = self.inner.done_tx.try_send(());
        }
    }
}
