//! Internal metrics collection.
//!
//! Collects metrics in-memory with plain atomics. A background task logs a
//! snapshot at a fixed interval; there is no external metrics sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 2ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    /// Top bucket matches the default read timeout; anything slower lands there.
    const BUCKET_BOUNDS: [u64; 11] = [1, 2, 5, 10, 25, 50, 100, 250, 500, 1000, 5000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        // Value exceeds all buckets, add to last
        self.buckets[10].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the request bin service.
#[derive(Debug, Default)]
pub struct Metrics {
    // Capture metrics
    pub requests_captured: Counter,
    pub bodies_truncated: Counter,
    pub capture_failures: Counter,
    pub invalid_bin_ids: Counter,

    // Store metrics
    pub appends_enqueued: Counter,
    pub clears_enqueued: Counter,
    pub delivery_failures: Counter,
    pub read_timeouts: Counter,
    pub records_evicted: Counter,
    pub bins_created: Counter,
    pub bins_swept: Counter,

    // Render metrics
    pub history_reads: Counter,
    pub pages_rendered: Counter,
    pub render_errors: Counter,

    // Latency histograms
    pub capture_latency_ms: Histogram,
    pub read_latency_ms: Histogram,
    pub render_latency_ms: Histogram,

    // Gauges
    pub active_bins: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub requests_captured: u64,
    pub bodies_truncated: u64,
    pub capture_failures: u64,
    pub invalid_bin_ids: u64,
    pub appends_enqueued: u64,
    pub clears_enqueued: u64,
    pub delivery_failures: u64,
    pub read_timeouts: u64,
    pub records_evicted: u64,
    pub bins_created: u64,
    pub bins_swept: u64,
    pub history_reads: u64,
    pub pages_rendered: u64,
    pub render_errors: u64,
    pub capture_latency_mean_ms: f64,
    pub read_latency_mean_ms: f64,
    pub render_latency_mean_ms: f64,
    pub active_bins: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            requests_captured: self.requests_captured.get(),
            bodies_truncated: self.bodies_truncated.get(),
            capture_failures: self.capture_failures.get(),
            invalid_bin_ids: self.invalid_bin_ids.get(),
            appends_enqueued: self.appends_enqueued.get(),
            clears_enqueued: self.clears_enqueued.get(),
            delivery_failures: self.delivery_failures.get(),
            read_timeouts: self.read_timeouts.get(),
            records_evicted: self.records_evicted.get(),
            bins_created: self.bins_created.get(),
            bins_swept: self.bins_swept.get(),
            history_reads: self.history_reads.get(),
            pages_rendered: self.pages_rendered.get(),
            render_errors: self.render_errors.get(),
            capture_latency_mean_ms: self.capture_latency_ms.mean(),
            read_latency_mean_ms: self.read_latency_ms.mean(),
            render_latency_mean_ms: self.render_latency_ms.mean(),
            active_bins: self.active_bins.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}

/// Start a background task that logs a metrics snapshot at a fixed interval.
/// Returns a handle that can be used to cancel the task.
pub fn start_snapshot_logger(every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately; skip it so the first log
        // carries a full interval of data.
        interval.tick().await;
        loop {
            interval.tick().await;
            let snapshot = metrics().snapshot();
            tracing::info!(
                captured = snapshot.requests_captured,
                reads = snapshot.history_reads,
                delivery_failures = snapshot.delivery_failures,
                read_timeouts = snapshot.read_timeouts,
                active_bins = snapshot.active_bins,
                capture_latency_mean_ms = snapshot.capture_latency_mean_ms,
                "Metrics snapshot"
            );
        }
    })
}
