//! Fan-in: a single thread owns the index and is the only writer to it. Hash tasks hand
//! records over the result channel; when every sender is gone the index is returned.

use crossbeam_channel::Receiver;
use log::debug;
use std::thread::{self, JoinHandle};

use crate::engine::progress::HashProgress;
use crate::{HashIndex, PathIndex, PathRecord};

/// An index a collector can build from records.
pub trait Aggregate: Default + Send + 'static {
    fn insert(&mut self, record: PathRecord);
}

impl Aggregate for HashIndex {
    /// Multi-map: append, keeping discovery order within a group.
    fn insert(&mut self, record: PathRecord) {
        self.entry(record.digest).or_default().push(record.path);
    }
}

impl Aggregate for PathIndex {
    fn insert(&mut self, record: PathRecord) {
        std::collections::HashMap::insert(self, record.path, record.digest);
    }
}

/// Drain `rx` into `A` until the channel closes. Returns the index and how many records it took.
pub fn collect_into<A: Aggregate>(
    rx: &Receiver<PathRecord>,
    progress: &mut HashProgress,
) -> (A, usize) {
    let mut index = A::default();
    let mut received = 0_usize;
    while let Ok(record) = rx.recv() {
        index.insert(record);
        received += 1;
        progress.tick();
    }
    (index, received)
}

/// Spawn the collector thread. The progress counter (verbose only) lives on this thread, drawn
/// on terminal line `position`.
pub fn spawn_collector<A: Aggregate>(
    rx: Receiver<PathRecord>,
    verbose: bool,
    label: &'static str,
    position: u16,
) -> JoinHandle<(A, usize)> {
    thread::spawn(move || {
        let mut progress = HashProgress::new(verbose, label, position);
        let (index, received) = collect_into::<A>(&rx, &mut progress);
        progress.finish();
        debug!("{}: done collecting, {} records", label, received);
        (index, received)
    })
}
