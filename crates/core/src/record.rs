//! Captured request records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One captured HTTP request, immutable once constructed.
///
/// Everything is stored as received: the method is not normalized, the path
/// keeps its query string, and header/query order is insertion order with
/// duplicates preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRecord {
    /// HTTP verb as received (GET, POST, custom verbs included).
    pub method: String,
    /// Request path including the query string, verbatim.
    pub path: String,
    /// Caller network address, or `"unknown"` when undeterminable.
    pub source_ip: String,
    /// Capture time (UTC).
    pub timestamp: DateTime<Utc>,
    /// Headers in wire order, minus the configured exclusion list.
    pub headers: Vec<(String, String)>,
    /// Query parameters in wire order, percent-decoded.
    pub query_params: Vec<(String, String)>,
    /// Body text, truncated at capture to the configured byte budget.
    pub body: String,
}

impl RequestRecord {
    /// Whether any body text was captured.
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}
