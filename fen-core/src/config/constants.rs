//! Tuned defaults for the messaging and simulation core.

use std::time::Duration;

/// Default cadence of the market-data generator loop.
pub const TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Default capacity of the tick output ring. Sized so a consumer stalled for
/// several seconds at full tick rate still loses nothing.
pub const TICK_RING_CAPACITY: usize = 1 << 20;

/// Default capacity of the worker pool's task queue.
pub const TASK_QUEUE_CAPACITY: usize = 8_192;

/// High-water mark for the latency reservoir; overflow drops the oldest half.
pub const LATENCY_RESERVOIR_LIMIT: usize = 100_000;

/// Price floor for generated quotes.
pub const MIN_PRICE: f64 = 0.01;

/// Minimum bid/ask spread the generator maintains.
pub const MIN_SPREAD: f64 = 0.01;

/// Target spread as a fraction of the mid price.
pub const SPREAD_RATIO: f64 = 0.001;

/// Per-step uniform price delta bound.
pub const PRICE_DELTA_BOUND: f64 = 0.001;

/// Volatility multiplier range.
pub const VOLATILITY_MIN: f64 = 0.8;
pub const VOLATILITY_MAX: f64 = 1.2;

/// Quote size distribution bounds (inclusive).
pub const SIZE_MIN: i64 = 100;
pub const SIZE_MAX: i64 = 10_000;
