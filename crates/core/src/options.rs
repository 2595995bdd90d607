//! Bin behavior options shared across the service.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::limits::{DEFAULT_BODY_MAX_LENGTH, DEFAULT_HISTORY_MAX_SIZE};

/// Capture and rendering options applied to every bin.
///
/// One instance is loaded at startup and shared; bins do not have per-bin
/// settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBinOptions {
    /// Maximum requests retained per bin (oldest evicted first).
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Captured body budget in bytes; larger bodies are truncated.
    #[serde(default = "default_max_body_length")]
    pub max_body_length: usize,
    /// Header names dropped at capture (ASCII case-insensitive).
    #[serde(default)]
    pub excluded_headers: Vec<String>,
    /// Template name for the history page renderer.
    #[serde(default = "default_renderer_template")]
    pub renderer_template: String,
}

fn default_max_size() -> usize {
    DEFAULT_HISTORY_MAX_SIZE
}

fn default_max_body_length() -> usize {
    DEFAULT_BODY_MAX_LENGTH
}

fn default_renderer_template() -> String {
    "dark.html".to_string()
}

impl Default for RequestBinOptions {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            max_body_length: default_max_body_length(),
            excluded_headers: Vec::new(),
            renderer_template: default_renderer_template(),
        }
    }
}

impl RequestBinOptions {
    /// Validate option values that cannot be clamped silently.
    ///
    /// Called once at startup; a zero-capacity history is a configuration
    /// mistake, not something to paper over at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(Error::config("bin.max_size must be greater than zero"));
        }
        Ok(())
    }

    /// Whether a header name is on the exclusion list.
    pub fn is_excluded_header(&self, name: &str) -> bool {
        self.excluded_headers
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(name))
    }
}
