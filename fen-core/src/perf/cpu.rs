//! CPU affinity and thread priority hints.
//!
//! Pinning the hot threads (market-data generator, feed consumer) to
//! dedicated cores avoids migration-induced cache evictions and latency
//! jitter. Both operations are best-effort: on platforms without support they
//! return an error and change nothing.

use anyhow::Result;
use core_affinity::CoreId;

/// Pin the current thread to a specific CPU core.
pub fn pin_to_core(core: usize) -> Result<()> {
    let core_id = CoreId { id: core };

    if core_affinity::set_for_current(core_id) {
        tracing::info!("pinned thread to CPU core {}", core);
        Ok(())
    } else {
        anyhow::bail!("failed to pin thread to core {}", core)
    }
}

/// Set SCHED_FIFO real-time priority for the current thread (Linux only).
///
/// Requires CAP_SYS_NICE or root.
#[cfg(target_os = "linux")]
pub fn set_realtime_priority(priority: i32) -> Result<()> {
    use libc::{sched_param, sched_setscheduler, SCHED_FIFO};

    unsafe {
        let param = sched_param {
            sched_priority: priority,
        };

        if sched_setscheduler(0, SCHED_FIFO, &param) == 0 {
            tracing::info!("set thread scheduling to SCHED_FIFO:{}", priority);
            Ok(())
        } else {
            anyhow::bail!("failed to set real-time priority (needs CAP_SYS_NICE or root)")
        }
    }
}

/// Real-time scheduling classes are unavailable off Linux; report failure
/// without touching thread state.
#[cfg(not(target_os = "linux"))]
pub fn set_realtime_priority(_priority: i32) -> Result<()> {
    anyhow::bail!("real-time priority is not supported on this platform")
}

/// Number of CPU cores visible to the process.
pub fn num_cores() -> usize {
    core_affinity::get_core_ids()
        .map(|ids| ids.len())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_cores_is_positive() {
        assert!(num_cores() > 0);
    }

    #[test]
    fn pin_to_core_does_not_panic() {
        // Pinning may legitimately fail without privileges or on exotic
        // platforms; we only require a clean Result either way.
        let _ = pin_to_core(0);
    }

    #[test]
    fn realtime_priority_does_not_panic() {
        // Fails without privileges (or off Linux); must not abort.
        let _ = set_realtime_priority(1);
    }
}
