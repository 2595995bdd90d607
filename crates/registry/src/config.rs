//! Registry configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use bin_core::limits::{
    DEFAULT_MAILBOX_CAPACITY, DEFAULT_READ_TIMEOUT_MS, DEFAULT_SWEEP_INTERVAL_SECS,
};

/// Bin registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Command mailbox capacity per bin entity
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
    /// Timeout for reads awaiting an entity reply, in milliseconds
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Idle-bin retention settings
    #[serde(default)]
    pub retention: RetentionConfig,
}

/// Idle-bin retention settings.
///
/// With `idle_ttl_secs` unset, bins live for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Drop bins idle longer than this many seconds (absent = never)
    pub idle_ttl_secs: Option<u64>,
    /// Interval between sweeps, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_mailbox_capacity() -> usize {
    DEFAULT_MAILBOX_CAPACITY
}

fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

fn default_sweep_interval_secs() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECS
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: default_mailbox_capacity(),
            read_timeout_ms: default_read_timeout_ms(),
            retention: RetentionConfig::default(),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: None,
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl RegistryConfig {
    /// Read timeout as a `Duration`.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl RetentionConfig {
    /// Idle TTL as a `Duration`, if retention is enabled.
    pub fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl_secs.map(Duration::from_secs)
    }

    /// Sweep interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
