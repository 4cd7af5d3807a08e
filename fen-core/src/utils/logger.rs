use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing output for the process.
///
/// `RUST_LOG` wins over `default_level`. With `json_logs` the fmt layer emits
/// structured JSON lines; otherwise human-readable output without targets.
/// Safe to call more than once: a later call leaves the installed subscriber
/// in place instead of erroring, so embedding binaries and tests can both go
/// through this path.
pub fn init_logger(default_level: &str, json_logs: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    let already_set = if json_logs {
        registry.with(fmt::layer().json()).try_init().is_err()
    } else {
        registry
            .with(fmt::layer().with_target(false))
            .try_init()
            .is_err()
    };

    if already_set {
        tracing::debug!("tracing subscriber already installed, keeping it");
    }
    Ok(())
}
