//! Latency and throughput monitoring.
//!
//! Latency samples go into a mutex-protected reservoir; readers snapshot and
//! sort a copy, so writers never observe a partially sorted view. Operation
//! and byte counters are plain atomics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::constants::LATENCY_RESERVOIR_LIMIT;
use crate::core::{LatencyStats, ThroughputStats};
use crate::time::clock::{self, Timestamp};

/// Records per-operation latencies and throughput counters.
pub struct PerformanceMonitor {
    samples: Mutex<Vec<Duration>>,
    total_operations: AtomicU64,
    total_bytes: AtomicU64,
    epoch: Mutex<Timestamp>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self {
            samples: Mutex::new(Vec::with_capacity(10_000)),
            total_operations: AtomicU64::new(0),
            total_bytes: AtomicU64::new(0),
            epoch: Mutex::new(clock::now()),
        }
    }

    /// Append a latency sample. When the reservoir exceeds its high-water
    /// mark the oldest half is discarded.
    pub fn record_latency(&self, latency: Duration) {
        let mut samples = self.samples.lock();
        samples.push(latency);

        if samples.len() > LATENCY_RESERVOIR_LIMIT {
            let half = samples.len() / 2;
            samples.drain(..half);
        }
    }

    /// Count one operation carrying `bytes` payload bytes.
    #[inline]
    pub fn record_operation(&self, bytes: u64) {
        self.total_operations.fetch_add(1, Ordering::Relaxed);
        self.total_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Latency distribution over the current reservoir.
    pub fn latency_stats(&self) -> LatencyStats {
        let snapshot = self.samples.lock().clone();
        if snapshot.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted = snapshot;
        sorted.sort_unstable();

        let count = sorted.len();
        let total_nanos: u128 = sorted.iter().map(|d| d.as_nanos()).sum();
        let mean = Duration::from_nanos((total_nanos / count as u128) as u64);

        let mut p99_index = (0.99 * count as f64) as usize;
        if p99_index >= count {
            p99_index = count - 1;
        }

        LatencyStats {
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            p99: sorted[p99_index],
            count: count as u64,
        }
    }

    /// Message and byte rates since `start_monitoring` (or construction).
    pub fn throughput_stats(&self) -> ThroughputStats {
        let elapsed_secs = self.epoch.lock().elapsed().as_secs();
        let total_messages = self.total_operations.load(Ordering::Relaxed);
        let total_bytes = self.total_bytes.load(Ordering::Relaxed);

        let (messages_per_second, bytes_per_second) = if elapsed_secs > 0 {
            (total_messages / elapsed_secs, total_bytes / elapsed_secs)
        } else {
            (0, 0)
        };

        ThroughputStats {
            messages_per_second,
            bytes_per_second,
            total_messages,
            total_bytes,
        }
    }

    /// Restart the throughput epoch without touching recorded data.
    pub fn start_monitoring(&self) {
        *self.epoch.lock() = clock::now();
    }

    /// Clear the reservoir and counters and restart the epoch.
    pub fn reset(&self) {
        self.samples.lock().clear();
        self.total_operations.store(0, Ordering::Relaxed);
        self.total_bytes.store(0, Ordering::Relaxed);
        self.start_monitoring();
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}
