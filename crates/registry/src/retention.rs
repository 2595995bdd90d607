//! Idle-bin retention sweeper.

use std::sync::Arc;

use tokio::time::interval;
use tracing::info;

use crate::registry::BinRegistry;

/// Start the idle-bin sweeper if retention is enabled.
///
/// Returns `None` when no `idle_ttl_secs` is configured, in which case bins
/// live for the lifetime of the process.
pub fn start_retention_sweeper(
    registry: Arc<BinRegistry>,
    retention: crate::config::RetentionConfig,
) -> Option<tokio::task::JoinHandle<()>> {
    let ttl = retention.idle_ttl()?;
    let every = retention.sweep_interval();

    info!(
        idle_ttl_secs = ttl.as_secs(),
        sweep_interval_secs = every.as_secs(),
        "Idle-bin retention enabled"
    );

    Some(tokio::spawn(async move {
        let mut ticker = interval(every);
        // Skip the immediate first tick; nothing can be idle yet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let swept = registry.sweep_idle(ttl);
            if swept > 0 {
                info!(swept, remaining = registry.bin_count(), "Swept idle bins");
            }
        }
    }))
}
