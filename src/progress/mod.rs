//! Progress reporting.
//!
//! The engine never touches a terminal directly; it reports through the
//! [`ProgressObserver`] port injected by the caller. The binary plugs in an
//! `indicatif` progress bar; tests and headless callers can use
//! [`NullProgress`] or their own counting observer.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

/// Receives one `unit_done` call per finished job, success or failure.
///
/// `begin` announces the total unit count before any worker starts, so
/// implementations can size a display up front. Implementations must be
/// safe to call from multiple workers concurrently.
pub trait ProgressObserver: Send + Sync {
    /// Called once before dispatch with the total number of jobs.
    fn begin(&self, total: u64);

    /// Called exactly once per job, after its result is recorded.
    fn unit_done(&self);

    /// Called once after every result has been drained.
    fn finish(&self);
}

/// Terminal progress bar backed by `indicatif`.
pub struct ConsoleProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        ConsoleProgress {
            bar: Mutex::new(None),
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ConsoleProgress {
    fn begin(&self, total: u64) {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} files ({elapsed})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn unit_done(&self) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.inc(1);
            }
        }
    }

    fn finish(&self) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.finish();
            }
        }
    }
}

/// Observer that discards all updates, for headless runs and tests.
pub struct NullProgress;

impl ProgressObserver for NullProgress {
    fn begin(&self, _total: u64) {}
    fn unit_done(&self) {}
    fn finish(&self) {}
}
