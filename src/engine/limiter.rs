//! Counting permit pool bounding in-flight tasks.
//!
//! A bounded channel is the semaphore: taking a permit pushes a token (blocking while the
//! channel is full), dropping the permit pops one. Walk and hash tasks share the same pool.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Inner {
    slots_tx: Sender<()>,
    slots_rx: Receiver<()>,
    capacity: usize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// Shared permit pool. Cloning shares the pool.
#[derive(Clone)]
pub struct Limiter {
    inner: Arc<Inner>,
}

/// One held permit; returned to the pool on drop.
#[must_use = "the permit is released as soon as it is dropped"]
pub struct Permit {
    inner: Arc<Inner>,
}

impl Limiter {
    /// Pool with `capacity` permits (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (slots_tx, slots_rx) = bounded(capacity);
        Self {
            inner: Arc::new(Inner {
                slots_tx,
                slots_rx,
                capacity,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }),
        }
    }

    /// Block until a permit is free and take it. Never fails: both channel ends live in the pool.
    /// Callers must not hold a permit while acquiring another.
    pub fn acquire(&self) -> Permit {
        let _ = self.inner.slots_tx.send(());
        let now = self.inner.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.inner.peak.fetch_max(now, Ordering::AcqRel);
        Permit {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Permits held right now.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Highest number of permits held at once since the pool was created.
    pub fn peak(&self) -> usize {
        self.inner.peak.load(Ordering::Acquire)
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.inner.in_flight.fetch_sub(1, Ordering::AcqRel);
        let _ = self.inner.slots_rx.try_recv();
    }
}
