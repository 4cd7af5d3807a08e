//! Core market data and order types.
//!
//! Everything that flows through the ring transport is defined here. `Tick`
//! and `Trade` are `Copy` and fixed-size so they can live directly in ring
//! slots without heap traffic; `Order` carries a client-id string and is the
//! only `Clone`-but-not-`Copy` record.

pub mod types;

pub use types::{
    LatencyStats, Order, OrderId, OrderStatus, OrderType, Price, Qty, Side, Symbol, ThroughputStats,
    Tick, Trade,
};
