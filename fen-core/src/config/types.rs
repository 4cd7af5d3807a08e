//! Deserializable configuration structures.

use serde::{Deserialize, Serialize};

use super::constants;

/// Market-data simulator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Generator loop frequency.
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: u32,

    /// Capacity of the tick output ring.
    #[serde(default = "default_ring_capacity")]
    pub ring_capacity: usize,

    /// Optional volatility override; rescales the multiplier distribution to
    /// `[1 - v, 1 + v]`.
    #[serde(default)]
    pub volatility: Option<f64>,

    /// Symbols to seed before start.
    #[serde(default)]
    pub symbols: Vec<SymbolConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolConfig {
    pub symbol: String,
    pub initial_price: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: default_ticks_per_second(),
            ring_capacity: default_ring_capacity(),
            volatility: None,
            symbols: Vec::new(),
        }
    }
}

fn default_ticks_per_second() -> u32 {
    1_000
}

fn default_ring_capacity() -> usize {
    constants::TICK_RING_CAPACITY
}
