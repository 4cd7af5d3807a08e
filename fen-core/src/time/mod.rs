//! Time and scheduling primitives.
//!
//! The monotonic clock in [`clock`] is the only timestamp source in the crate;
//! [`timer`] provides a drift-compensating periodic timer for heartbeat-style
//! scheduling.

pub mod clock;
pub mod timer;

pub use clock::{now, Timestamp};
pub use timer::PeriodicTimer;
