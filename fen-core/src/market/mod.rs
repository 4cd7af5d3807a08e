//! Synthetic market data: the tick generator and the subscription-filtering
//! feed facade in front of it.

pub mod engine;
pub mod feed;

pub use engine::MarketDataSimulator;
pub use feed::{MarketFeed, SimulatedMarketDataFeed};
