//! View models for the history page.
//!
//! Values are passed to the template engine unescaped; escaping happens in
//! the engine (templates are named `*.html`, which turns autoescape on).

use chrono::{DateTime, Utc};
use serde::Serialize;

use bin_core::{HistorySnapshot, RequestBinOptions, RequestRecord};

/// Everything one history page needs.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub bin_id: String,
    pub bin_url: String,
    /// Page generation time, for the footer.
    pub generated_at: String,
    /// Set for error pages and for empty bins; the template shows it instead
    /// of the request list.
    pub error_message: Option<String>,
    /// Captured requests, newest first.
    pub requests: Vec<RequestView>,
    pub settings: SettingsView,
}

/// One captured request, display-ready.
#[derive(Debug, Clone, Serialize)]
pub struct RequestView {
    pub method: String,
    pub path: String,
    pub source_ip: String,
    pub timestamp: String,
    pub headers: Vec<PairView>,
    pub query_params: Vec<PairView>,
    pub body: String,
    pub has_body: bool,
}

/// A name/value pair (header or query parameter).
#[derive(Debug, Clone, Serialize)]
pub struct PairView {
    pub name: String,
    pub value: String,
}

/// Deployment settings shown in the page footer.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsView {
    pub renderer_template: String,
    pub max_size: usize,
    pub max_body_length: usize,
}

impl From<&RequestBinOptions> for SettingsView {
    fn from(options: &RequestBinOptions) -> Self {
        Self {
            renderer_template: options.renderer_template.clone(),
            max_size: options.max_size,
            max_body_length: options.max_body_length,
        }
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string()
}

fn pairs(source: &[(String, String)]) -> Vec<PairView> {
    source
        .iter()
        .map(|(name, value)| PairView {
            name: name.clone(),
            value: value.clone(),
        })
        .collect()
}

impl RequestView {
    fn from_record(record: &RequestRecord) -> Self {
        Self {
            method: record.method.clone(),
            path: record.path.clone(),
            source_ip: record.source_ip.clone(),
            timestamp: format_timestamp(record.timestamp),
            headers: pairs(&record.headers),
            query_params: pairs(&record.query_params),
            body: record.body.clone(),
            has_body: record.has_body(),
        }
    }
}

impl HistoryView {
    /// View of a bin's history. Empty bins get the usage hint instead of a
    /// request list.
    pub fn for_bin(
        bin_id: &str,
        bin_url: &str,
        snapshot: &HistorySnapshot,
        options: &RequestBinOptions,
    ) -> Self {
        if snapshot.is_empty() {
            return Self::for_error(
                bin_id,
                bin_url,
                format!("Request Bin with Id '{bin_id}' is empty. Send your requests to {bin_url}."),
                options,
            );
        }

        // Newest first; the sort is stable, so records sharing a timestamp
        // keep their insertion order.
        let mut ordered: Vec<&RequestRecord> = snapshot.records.iter().collect();
        ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Self {
            bin_id: bin_id.to_string(),
            bin_url: bin_url.to_string(),
            generated_at: format_timestamp(Utc::now()),
            error_message: None,
            requests: ordered.iter().map(|r| RequestView::from_record(r)).collect(),
            settings: SettingsView::from(options),
        }
    }

    /// View carrying a message instead of requests (errors, empty bins).
    pub fn for_error(
        bin_id: &str,
        bin_url: &str,
        message: impl Into<String>,
        options: &RequestBinOptions,
    ) -> Self {
        Self {
            bin_id: bin_id.to_string(),
            bin_url: bin_url.to_string(),
            generated_at: format_timestamp(Utc::now()),
            error_message: Some(message.into()),
            requests: Vec::new(),
            settings: SettingsView::from(options),
        }
    }
}
