//! The per-bin entity: a single-consumer task owning one bin's history.
//!
//! All mutations of a bin's state happen inside its entity task, one command
//! at a time in mailbox order. That single consumer is the per-key FIFO
//! guarantee; nothing else ever touches the history.

use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use bin_core::{BinHistory, BinId, HistorySnapshot, RequestRecord};
use telemetry::metrics;

/// Commands understood by a bin entity.
#[derive(Debug)]
pub enum BinCommand {
    /// Append a captured request, evicting the oldest when over capacity.
    Append(RequestRecord),
    /// Reset the history to empty.
    Clear,
    /// Reply with an owned snapshot of the current history.
    Read(oneshot::Sender<HistorySnapshot>),
}

/// Client handle to one bin entity.
///
/// Cloning is cheap; all clones feed the same mailbox. The entity stops when
/// every handle is gone (the registry holds the long-lived one).
#[derive(Debug, Clone)]
pub struct BinHandle {
    tx: mpsc::Sender<BinCommand>,
    /// Last dispatch through the registry, used by the idle sweeper.
    pub(crate) last_activity: Instant,
}

impl BinHandle {
    /// Spawn a new entity task and return its handle.
    pub fn spawn(bin_id: BinId, max_size: usize, mailbox_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(mailbox_capacity);
        tokio::spawn(run_entity(bin_id, BinHistory::new(max_size), rx));
        Self {
            tx,
            last_activity: Instant::now(),
        }
    }

    /// Enqueue a command, waiting for mailbox capacity.
    ///
    /// Returns the command back on failure so the caller can retry it
    /// against a new entity.
    pub async fn send(&self, cmd: BinCommand) -> Result<(), BinCommand> {
        self.tx.send(cmd).await.map_err(|e| e.0)
    }

    /// Whether this handle feeds the same mailbox as `other`.
    pub fn same_entity(&self, other: &BinHandle) -> bool {
        self.tx.same_channel(&other.tx)
    }

    #[cfg(test)]
    pub(crate) fn from_parts(tx: mpsc::Sender<BinCommand>, last_activity: Instant) -> Self {
        Self { tx, last_activity }
    }

    #[cfg(test)]
    pub(crate) fn dead(last_activity: Instant) -> Self {
        let (tx, _) = mpsc::channel(1);
        Self { tx, last_activity }
    }
}

/// Entity task body: drain the mailbox until every sender is gone.
async fn run_entity(bin_id: BinId, mut history: BinHistory, mut rx: mpsc::Receiver<BinCommand>) {
    debug!(bin_id = %bin_id, max_size = history.max_size(), "Bin entity started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            BinCommand::Append(record) => {
                let evicted = history.append(record);
                if evicted > 0 {
                    metrics().records_evicted.inc_by(evicted as u64);
                }
                debug!(
                    bin_id = %bin_id,
                    len = history.len(),
                    evicted,
                    "Appended request to bin"
                );
            }
            BinCommand::Clear => {
                history.clear();
                debug!(bin_id = %bin_id, "Cleared bin");
            }
            BinCommand::Read(reply) => {
                // The reader may have timed out and dropped the receiver;
                // that is its problem, not ours.
                let _ = reply.send(history.snapshot());
            }
        }
    }

    debug!(bin_id = %bin_id, len = history.len(), "Bin entity stopped");
}
