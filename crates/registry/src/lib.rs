//! Per-bin entity registry for the request bin service.
//!
//! One tokio task per bin owns that bin's history; the registry routes
//! commands to it by bin id. See [`registry::BinStore`] for the contract the
//! HTTP layer consumes.

pub mod config;
pub mod entity;
pub mod registry;
pub mod retention;

pub use config::{RegistryConfig, RetentionConfig};
pub use entity::{BinCommand, BinHandle};
pub use registry::{BinRegistry, BinStore, SharedBinStore};
pub use retention::start_retention_sweeper;
