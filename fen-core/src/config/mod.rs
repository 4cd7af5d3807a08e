//! Runtime configuration and tuned defaults.

pub mod constants;
pub mod types;

pub use types::{SimulatorConfig, SymbolConfig};
