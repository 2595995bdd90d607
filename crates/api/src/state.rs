//! Application state shared across handlers.

use std::sync::Arc;

use bin_core::RequestBinOptions;
use registry::SharedBinStore;
use render::HistoryRenderer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Bin store (actor registry in production, mock in tests)
    pub store: SharedBinStore,
    /// History page renderer
    pub renderer: Arc<dyn HistoryRenderer>,
    /// Capture settings (history size, body limit, excluded headers)
    pub options: RequestBinOptions,
}

impl AppState {
    pub fn new(
        store: SharedBinStore,
        renderer: Arc<dyn HistoryRenderer>,
        options: RequestBinOptions,
    ) -> Self {
        Self {
            store,
            renderer,
            options,
        }
    }
}
