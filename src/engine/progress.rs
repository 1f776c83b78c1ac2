//! Progress counter for the hashing phase (verbose mode only).

use kdam::{Animation, Bar, BarExt};

use crate::utils::config::ProgressConsts;

/// Create a counter for unknown total (shows count without percentage) on terminal line
/// `position`; concurrent counters need distinct positions.
pub fn create_counter(desc: &'static str, position: u16) -> Bar {
    kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = position,
        unit = " files"
    )
}

/// Batched file counter owned by a collector. A no-op when disabled.
pub struct HashProgress {
    bar: Option<Bar>,
    pending: usize,
}

impl HashProgress {
    pub fn new(enabled: bool, desc: &'static str, position: u16) -> Self {
        let bar = enabled.then(|| {
            let mut b = create_counter(desc, position);
            let _ = b.refresh();
            b
        });
        Self { bar, pending: 0 }
    }

    /// Count one record; redraws every `PROGRESS_UPDATE_BATCH_SIZE` records.
    pub fn tick(&mut self) {
        let Some(bar) = self.bar.as_mut() else {
            return;
        };
        self.pending += 1;
        if self.pending >= ProgressConsts::PROGRESS_UPDATE_BATCH_SIZE {
            let _ = bar.update(self.pending);
            self.pending = 0;
        }
    }

    /// Flush the remainder and end the line.
    pub fn finish(mut self) {
        if let Some(bar) = self.bar.as_mut() {
            if self.pending > 0 {
                let _ = bar.update(self.pending);
            }
            let _ = bar.refresh();
            eprintln!();
        }
    }
}
