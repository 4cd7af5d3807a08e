//! Common utilities for all binaries
//!
//! Shared initialization, CLI parsing, and setup code.

use anyhow::Result;
use clap::Parser;

/// Common CLI arguments for all binaries
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CommonArgs {
    /// CPU core to pin to (for performance)
    #[arg(short = 'c', long)]
    pub cpu_core: Option<usize>,

    /// Enable real-time priority (requires privileges)
    #[arg(long)]
    pub realtime: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

/// Initialize tracing/logging
pub fn init_logging(level: &str) -> Result<()> {
    fen_core::utils::logger::init_logger(level, false)
}

/// Setup CPU affinity and real-time priority
pub fn setup_performance(cpu_core: Option<usize>, realtime: bool) -> Result<()> {
    if let Some(core) = cpu_core {
        fen_core::perf::cpu::pin_to_core(core)?;
    }

    if realtime {
        if let Err(error) = fen_core::perf::cpu::set_realtime_priority(50) {
            tracing::warn!(%error, "continuing without real-time priority");
        }
    }

    Ok(())
}
