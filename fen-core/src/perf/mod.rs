//! Performance utilities: CPU pinning, object pooling, latency monitoring.

pub mod cpu;
pub mod monitor;
pub mod pool;

pub use cpu::{num_cores, pin_to_core, set_realtime_priority};
pub use monitor::PerformanceMonitor;
pub use pool::{PoolGuard, SlotPool};
