//! Subscription-filtering feed facade.
//!
//! The generator publishes every symbol into one ring; filtering happens on
//! the consumer side after the pop. That keeps per-symbol dispatch out of the
//! producer's hot path at the cost of discarding ticks nobody subscribed to.

use parking_lot::Mutex;

use crate::core::{Symbol, Tick};
use crate::market::engine::MarketDataSimulator;

/// Capability set of a market-data feed.
pub trait MarketFeed {
    fn subscribe(&self, symbol: Symbol);
    fn unsubscribe(&self, symbol: Symbol);

    /// Pop at most one tick, non-blocking. Returns `None` when the stream is
    /// empty or the next tick's symbol is not subscribed (the tick is
    /// discarded in that case).
    fn get_tick(&self) -> Option<Tick>;

    fn subscribed_symbols(&self) -> Vec<Symbol>;
}

/// Feed backed by the synthetic tick generator.
pub struct SimulatedMarketDataFeed {
    simulator: MarketDataSimulator,
    subscriptions: Mutex<Vec<Symbol>>,
}

impl SimulatedMarketDataFeed {
    pub fn new() -> Self {
        Self::with_simulator(MarketDataSimulator::new())
    }

    pub fn with_simulator(simulator: MarketDataSimulator) -> Self {
        Self {
            simulator,
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Register a symbol in the underlying generator. Fails once the
    /// simulation is running.
    pub fn set_initial_price(&self, symbol: &str, price: f64) -> anyhow::Result<()> {
        self.simulator.add_symbol(symbol, price)
    }

    pub fn set_volatility(&self, volatility: f64) {
        self.simulator.set_volatility(volatility);
    }

    pub fn start_simulation(&mut self) {
        self.simulator.start();
    }

    pub fn stop_simulation(&mut self) {
        self.simulator.stop();
    }

    pub fn simulator(&self) -> &MarketDataSimulator {
        &self.simulator
    }
}

impl Default for SimulatedMarketDataFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketFeed for SimulatedMarketDataFeed {
    fn subscribe(&self, symbol: Symbol) {
        let mut subscriptions = self.subscriptions.lock();
        if !subscriptions.contains(&symbol) {
            subscriptions.push(symbol);
        }
    }

    fn unsubscribe(&self, symbol: Symbol) {
        self.subscriptions.lock().retain(|s| *s != symbol);
    }

    fn get_tick(&self) -> Option<Tick> {
        let tick = self.simulator.next_tick()?;
        if self.subscriptions.lock().contains(&tick.symbol) {
            Some(tick)
        } else {
            // Not subscribed: the tick is consumed and dropped.
            None
        }
    }

    fn subscribed_symbols(&self) -> Vec<Symbol> {
        self.subscriptions.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_ignores_duplicates() {
        let feed = SimulatedMarketDataFeed::new();
        feed.subscribe(Symbol::new("AAPL"));
        feed.subscribe(Symbol::new("AAPL"));
        feed.subscribe(Symbol::new("GOOGL"));

        assert_eq!(feed.subscribed_symbols().len(), 2);
    }

    #[test]
    fn unsubscribe_removes_symbol() {
        let feed = SimulatedMarketDataFeed::new();
        feed.subscribe(Symbol::new("AAPL"));
        feed.subscribe(Symbol::new("GOOGL"));

        feed.unsubscribe(Symbol::new("AAPL"));
        let symbols = feed.subscribed_symbols();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0], "GOOGL");

        // Unsubscribing something absent is a no-op.
        feed.unsubscribe(Symbol::new("MSFT"));
        assert_eq!(feed.subscribed_symbols().len(), 1);
    }

    #[test]
    fn get_tick_filters_unsubscribed_symbols() {
        let mut feed = SimulatedMarketDataFeed::new();
        feed.set_initial_price("AAPL", 150.0).unwrap();
        feed.set_initial_price("MSFT", 300.0).unwrap();
        feed.subscribe(Symbol::new("AAPL"));

        feed.start_simulation();

        let mut seen_aapl = 0;
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        while seen_aapl < 10 && std::time::Instant::now() < deadline {
            if let Some(tick) = feed.get_tick() {
                assert_eq!(tick.symbol, "AAPL");
                seen_aapl += 1;
            }
        }
        feed.stop_simulation();

        assert!(seen_aapl >= 10, "expected filtered ticks, got {}", seen_aapl);
    }
}
