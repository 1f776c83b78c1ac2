//! Error classification and run-wide abort.
//!
//! A vanished path is absorbed where it is seen. Anything else is fatal: the task that hit it
//! raises the [`AbortSignal`], every other task checks the flag before doing I/O, and the
//! orchestrator is woken through a channel instead of waiting for in-flight tasks to drain.

use anyhow::Error;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// True for the benign race where an entry disappeared between enumeration and use.
pub fn is_vanished(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

/// Same as [`is_vanished`] for a directory-enumeration error.
pub fn walk_error_is_vanished(err: &walkdir::Error) -> bool {
    err.io_error().is_some_and(is_vanished)
}

struct AbortInner {
    raised: AtomicBool,
    first_error: Mutex<Option<Error>>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

/// Run-wide fatal error slot; first error wins. Cloning shares it.
#[derive(Clone)]
pub struct AbortSignal {
    inner: Arc<AbortInner>,
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortSignal {
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = bounded(1);
        Self {
            inner: Arc::new(AbortInner {
                raised: AtomicBool::new(false),
                first_error: Mutex::new(None),
                wake_tx,
                wake_rx,
            }),
        }
    }

    /// Record `err` (if it is the first) and stop the run.
    pub fn raise(&self, err: Error) {
        {
            let mut slot = self
                .inner
                .first_error
                .lock()
                .unwrap_or_else(|p| p.into_inner());
            if slot.is_none() {
                log::debug!("aborting run: {:#}", err);
                *slot = Some(err);
            }
        }
        self.inner.raised.store(true, Ordering::Release);
        let _ = self.inner.wake_tx.try_send(());
    }

    /// Cheap check for tasks about to do work.
    pub fn is_raised(&self) -> bool {
        self.inner.raised.load(Ordering::Acquire)
    }

    /// Becomes ready once [`raise`](Self::raise) has been called. Use in `select!`.
    pub fn notified(&self) -> &Receiver<()> {
        &self.inner.wake_rx
    }

    /// Return the recorded error, if any. Call after the run has stopped.
    pub fn check(&self) -> crate::Result<()> {
        if !self.is_raised() {
            return Ok(());
        }
        let taken = self
            .inner
            .first_error
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        match taken {
            Some(err) => Err(err),
            None => Err(anyhow::anyhow!("run aborted")),
        }
    }
}
