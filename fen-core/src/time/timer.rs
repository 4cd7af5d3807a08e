//! Drift-compensating periodic timer.
//!
//! Fires a callback on a fixed cadence anchored at the instant `start` was
//! called: the Nth fire is scheduled at `anchor + N * interval`, not
//! `previous_fire + interval`, so callback duration does not accumulate drift.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::time::clock;

/// Periodic timer driving a callback on its own thread.
///
/// `start`/`stop` are idempotent. Stopping prevents further fires but lets an
/// in-progress callback run to completion (the join waits for it).
pub struct PeriodicTimer {
    interval: Duration,
    callback: Arc<dyn Fn() + Send + Sync>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTimer {
    pub fn new(interval: Duration, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            interval,
            callback: Arc::new(callback),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Begin firing. No-op if already running.
    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::AcqRel) {
            return;
        }

        let running = Arc::clone(&self.running);
        let callback = Arc::clone(&self.callback);
        let interval = self.interval;

        self.handle = Some(thread::spawn(move || {
            let mut next_fire = clock::now();
            while running.load(Ordering::Acquire) {
                next_fire += interval;
                callback();
                clock::sleep_until(next_fire);
            }
        }));
    }

    /// Stop firing and join the timer thread. No-op if not running.
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the firing interval. Ignored while the timer is running; stop
    /// first, then reconfigure.
    pub fn set_interval(&mut self, interval: Duration) {
        if self.is_running() {
            tracing::warn!("set_interval ignored while timer is running");
            return;
        }
        self.interval = interval;
    }
}

impl Drop for PeriodicTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
