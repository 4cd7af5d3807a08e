//! Lock-free ring transport.
//!
//! Two bounded rings for fixed-size records:
//! - [`SpscRing`]: single producer, single consumer. The market-data hot
//!   path: one engine thread pushing ticks, one feed thread popping them.
//! - [`MpscRing`]: multiple producers, single consumer, used as the worker
//!   pool's task queue.
//!
//! Neither ring blocks, allocates, or panics on the operational path.
//! Capacity exhaustion is reported to the caller as a rejected push.

pub mod mpsc;
pub mod spsc;

pub use mpsc::MpscRing;
pub use spsc::SpscRing;
