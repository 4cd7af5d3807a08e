//! Fen Core - Low-Latency Messaging and Simulation Core
//!
//! The messaging and simulation heart of the fen HFT simulator: lock-free
//! ring transport, a synthetic market-data engine on a 1 ms cadence, and a
//! FIX 4.4 codec with a sequence-numbered session engine.
//!
//! ## System Architecture
//!
//! ```text
//! ┌──────────────────┐   SPSC ring    ┌──────────────────┐
//! │ MarketDataSim    │───────────────▶│ SimulatedFeed    │──▶ strategies
//! │ (generator       │   Tick (Copy)  │ (subscription    │    (callers)
//! │  thread, 1 ms)   │                │  filter)         │
//! └──────────────────┘                └──────────────────┘
//!                                              │
//!                                              ▼ tick_to_market_data_snapshot
//! ┌──────────────────┐   MPSC ring    ┌──────────────────┐
//! │ WorkerPool       │◀───────────────│ FixSession       │──▶ NEW_ORDER_SINGLE,
//! │ (N threads,      │   Box<FnOnce>  │ (seq numbers,    │    MARKET_DATA_SNAPSHOT
//! │  panic-isolated) │                │  dispatch table) │    frames
//! └──────────────────┘                └──────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! - **Non-blocking transport** - ring operations never block, allocate, or
//!   panic; capacity exhaustion is a rejected push the caller sees.
//! - **Cache-line separation** - producer and consumer indices live in
//!   `CachePadded` slots so the two hot threads never false-share.
//! - **One clock** - every `Tick`, `Trade`, and latency sample is stamped
//!   from the monotonic clock in [`time::clock`]; wall time only appears in
//!   FIX SENDING_TIME annotations.
//! - **Drop, don't stall** - a full tick ring drops the tick and counts it;
//!   the generator cadence is never disturbed by a slow consumer.
//!
//! ## Core Modules
//!
//! - [`transport`] - SPSC/MPSC ring buffers
//! - [`market`] - synthetic tick generator and filtering feed facade
//! - [`fix`] - FIX 4.4 codec, session engine, converters
//! - [`perf`] - CPU pinning, slot-arena object pool, latency monitor
//! - [`workers`] - fixed worker pool over the MPSC queue
//! - [`time`] - monotonic clock and periodic timer
//! - [`core`] - `Tick`/`Trade`/`Order` records and stats types

pub mod config;
pub mod core;
pub mod fix;
pub mod market;
pub mod perf;
pub mod time;
pub mod transport;
pub mod utils;
pub mod workers;

pub use crate::core::{
    LatencyStats, Order, OrderId, OrderStatus, OrderType, Price, Qty, Side, Symbol,
    ThroughputStats, Tick, Trade,
};
pub use crate::fix::{FixMessage, FixProtocolAdapter, FixSession};
pub use crate::market::{MarketDataSimulator, MarketFeed, SimulatedMarketDataFeed};
pub use crate::perf::PerformanceMonitor;
pub use crate::workers::WorkerPool;

// Re-export error types
pub use anyhow::{Error, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::core::{Order, OrderStatus, OrderType, Side, Symbol, Tick, Trade};
    pub use crate::fix::{msg_type, tags, FixMessage, FixSession};
    pub use crate::market::{MarketDataSimulator, MarketFeed, SimulatedMarketDataFeed};
    pub use crate::perf::{PerformanceMonitor, SlotPool};
    pub use crate::time::PeriodicTimer;
    pub use crate::transport::{MpscRing, SpscRing};
    pub use crate::workers::WorkerPool;
    pub use crate::{Error, Result};
}
