//! Test fixtures and request generators.

use chrono::Utc;
use uuid::Uuid;

use bin_core::{BinId, HistorySnapshot, RequestRecord};

/// A unique bin id, so parallel tests never share a bin.
pub fn unique_bin_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parse a known-good bin id.
pub fn bin_id(s: &str) -> BinId {
    BinId::parse(s).expect("fixture bin id should be valid")
}

/// A captured-request record with the given path.
pub fn record(path: &str) -> RequestRecord {
    RequestRecord {
        method: "POST".into(),
        path: path.into(),
        source_ip: "203.0.113.9".into(),
        timestamp: Utc::now(),
        headers: vec![("content-type".into(), "application/json".into())],
        query_params: Vec::new(),
        body: format!("{{\"path\":\"{path}\"}}"),
    }
}

/// A snapshot holding one record per path, oldest first.
pub fn snapshot_of(paths: &[&str], max_size: usize) -> HistorySnapshot {
    HistorySnapshot {
        records: paths.iter().map(|p| record(p)).collect(),
        max_size,
    }
}

/// A recognizable request body for roundtrip assertions.
pub fn json_body(tag: &str) -> String {
    format!("{{\"tag\":\"{tag}\"}}")
}
