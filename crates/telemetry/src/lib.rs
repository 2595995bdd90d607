//! Internal telemetry for the request bin service.
//!
//! No external metrics systems: counters and latency histograms live in
//! process and are logged periodically, and component health feeds the
//! `/health` endpoints.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
