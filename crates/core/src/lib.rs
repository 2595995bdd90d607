//! Core types and validation for the request bin service.

pub mod bin_id;
pub mod error;
pub mod history;
pub mod limits;
pub mod options;
pub mod record;

pub use bin_id::BinId;
pub use error::{Error, Result, StoreErrorCode};
pub use history::{BinHistory, HistorySnapshot};
pub use options::RequestBinOptions;
pub use record::RequestRecord;
