//! The bin registry: routes commands to per-bin entities.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, warn};

use bin_core::{BinId, Error, HistorySnapshot, RequestBinOptions, RequestRecord, Result};
use telemetry::metrics;

use crate::config::RegistryConfig;
use crate::entity::{BinCommand, BinHandle};

/// Store of bin histories, keyed by bin id.
///
/// The HTTP layer talks to this trait, never to entities directly; tests
/// substitute failing implementations to exercise error paths.
#[async_trait]
pub trait BinStore: Send + Sync {
    /// Append a captured request to the bin, creating the bin if unseen.
    ///
    /// Acknowledged once the command is enqueued in arrival order; the
    /// mutation itself happens asynchronously in the entity.
    async fn append(&self, bin_id: &BinId, record: RequestRecord) -> Result<()>;

    /// Reset the bin to empty, creating it if unseen. Idempotent.
    async fn clear(&self, bin_id: &BinId) -> Result<()>;

    /// Read an owned snapshot of the bin. Unseen bins read as empty.
    async fn read(&self, bin_id: &BinId) -> Result<HistorySnapshot>;

    /// Whether the store can currently accept commands.
    fn is_healthy(&self) -> bool;
}

/// In-process `BinStore` backed by one entity task per bin.
pub struct BinRegistry {
    bins: Mutex<HashMap<BinId, BinHandle>>,
    options: RequestBinOptions,
    config: RegistryConfig,
}

impl BinRegistry {
    pub fn new(options: RequestBinOptions, config: RegistryConfig) -> Self {
        Self {
            bins: Mutex::new(HashMap::new()),
            options,
            config,
        }
    }

    /// Number of live bins.
    pub fn bin_count(&self) -> usize {
        self.bins.lock().len()
    }

    /// Get the handle for a bin, spawning its entity if absent.
    ///
    /// Also refreshes the bin's activity stamp. Races on an unseen key are
    /// settled by the map lock: one caller inserts, the rest see its entry.
    fn get_or_create(&self, bin_id: &BinId) -> BinHandle {
        let mut bins = self.bins.lock();
        let count_before = bins.len();

        let handle = bins
            .entry(bin_id.clone())
            .or_insert_with(|| {
                debug!(bin_id = %bin_id, "Creating bin entity");
                BinHandle::spawn(
                    bin_id.clone(),
                    self.options.max_size,
                    self.config.mailbox_capacity,
                )
            });
        handle.last_activity = Instant::now();
        let handle = handle.clone();

        if bins.len() > count_before {
            metrics().bins_created.inc();
            metrics().active_bins.set(bins.len() as u64);
        }

        handle
    }

    /// Replace a dead handle with a fresh entity and return its handle.
    ///
    /// Only replaces the map entry if it still is the dead one; a concurrent
    /// dispatch may already have replaced it.
    fn replace_dead(&self, bin_id: &BinId, dead: &BinHandle) -> BinHandle {
        let mut bins = self.bins.lock();
        if let Some(current) = bins.get(bin_id) {
            if !current.same_entity(dead) {
                return current.clone();
            }
        }

        let handle = BinHandle::spawn(
            bin_id.clone(),
            self.options.max_size,
            self.config.mailbox_capacity,
        );
        bins.insert(bin_id.clone(), handle.clone());
        metrics().bins_created.inc();
        metrics().active_bins.set(bins.len() as u64);
        handle
    }

    /// Deliver a command to the bin's entity.
    ///
    /// A closed mailbox means the entity was swept between lookup and send;
    /// that is retried once against a fresh entity before giving up. Failures
    /// surface as delivery errors, never as silent drops.
    async fn dispatch(&self, bin_id: &BinId, cmd: BinCommand) -> Result<()> {
        let handle = self.get_or_create(bin_id);

        let cmd = match handle.send(cmd).await {
            Ok(()) => return Ok(()),
            Err(cmd) => cmd,
        };

        warn!(bin_id = %bin_id, "Bin entity mailbox closed, retrying against a fresh entity");
        let fresh = self.replace_dead(bin_id, &handle);
        fresh.send(cmd).await.map_err(|_| {
            metrics().delivery_failures.inc();
            Error::delivery(format!("could not deliver command to bin '{bin_id}'"))
        })
    }

    /// Drop bins idle longer than `ttl`. Returns how many were dropped.
    ///
    /// Dropping the registry's handle closes the mailbox once in-flight
    /// clones are gone; the entity then drains and stops.
    pub fn sweep_idle(&self, ttl: std::time::Duration) -> usize {
        let mut bins = self.bins.lock();
        let before = bins.len();
        bins.retain(|_, handle| handle.last_activity.elapsed() < ttl);
        let swept = before - bins.len();

        if swept > 0 {
            metrics().bins_swept.inc_by(swept as u64);
            metrics().active_bins.set(bins.len() as u64);
        }
        swept
    }

    #[cfg(test)]
    pub(crate) fn insert_dead_handle(&self, bin_id: &BinId) {
        self.bins
            .lock()
            .insert(bin_id.clone(), BinHandle::dead(Instant::now()));
    }
}

#[async_trait]
impl BinStore for BinRegistry {
    async fn append(&self, bin_id: &BinId, record: RequestRecord) -> Result<()> {
        self.dispatch(bin_id, BinCommand::Append(record)).await?;
        metrics().appends_enqueued.inc();
        Ok(())
    }

    async fn clear(&self, bin_id: &BinId) -> Result<()> {
        self.dispatch(bin_id, BinCommand::Clear).await?;
        metrics().clears_enqueued.inc();
        Ok(())
    }

    async fn read(&self, bin_id: &BinId) -> Result<HistorySnapshot> {
        let start = Instant::now();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.dispatch(bin_id, BinCommand::Read(reply_tx)).await?;

        let snapshot = match timeout(self.config.read_timeout(), reply_rx).await {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(_)) => {
                // Entity died between dequeueing the read and replying.
                metrics().delivery_failures.inc();
                return Err(Error::delivery(format!(
                    "bin '{bin_id}' dropped the read reply"
                )));
            }
            Err(_) => {
                metrics().read_timeouts.inc();
                return Err(Error::read_timeout(format!(
                    "read of bin '{bin_id}' timed out after {}ms",
                    self.config.read_timeout_ms
                )));
            }
        };

        metrics().history_reads.inc();
        metrics()
            .read_latency_ms
            .observe(start.elapsed().as_millis() as u64);
        Ok(snapshot)
    }

    fn is_healthy(&self) -> bool {
        // In-process store; entities are spawned on demand.
        true
    }
}

/// Shared registry handle.
pub type SharedBinStore = Arc<dyn BinStore>;
