//! Common test setup functions.

use std::sync::Arc;

use api::{router, AppState};
use axum::Router;
use bin_core::{BinId, HistorySnapshot, RequestBinOptions};
use registry::{BinRegistry, BinStore, RegistryConfig, SharedBinStore};
use render::{HistoryRenderer, HtmlRenderer};
use telemetry::health;

use crate::mocks::MockBinStore;

/// Test context with a real registry and renderer.
///
/// This exercises the same production code paths by:
/// - Using the real Axum router with all middleware
/// - Using a real `BinRegistry`, so appends flow through bin entities
/// - Using the real `HtmlRenderer` with the configured template
pub struct TestContext {
    pub registry: Arc<BinRegistry>,
    pub options: RequestBinOptions,
    pub router: Router,
}

impl TestContext {
    /// Create a test context with default options.
    pub fn new() -> Self {
        Self::with_options(RequestBinOptions::default())
    }

    /// Create a test context with custom bin options.
    pub fn with_options(options: RequestBinOptions) -> Self {
        let renderer =
            Arc::new(HtmlRenderer::new(options.clone()).expect("Failed to create renderer"));
        let registry = Arc::new(BinRegistry::new(options.clone(), RegistryConfig::default()));

        // Mirror what startup does so /health reports both components.
        health().registry.set_healthy();
        health().renderer.set_healthy();

        let store: SharedBinStore = registry.clone();
        let state = AppState::new(store, renderer, options.clone());
        let router = router(state);

        Self {
            registry,
            options,
            router,
        }
    }

    /// Read a bin's history straight from the store, bypassing HTTP.
    pub async fn read_bin(&self, bin_id: &str) -> HistorySnapshot {
        let bin_id = BinId::parse(bin_id).expect("test bin id should be valid");
        self.registry
            .read(&bin_id)
            .await
            .expect("store read should succeed")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Test context backed by a mock store, for exercising failure paths.
pub struct MockContext {
    pub store: Arc<MockBinStore>,
    pub router: Router,
}

impl MockContext {
    pub fn new() -> Self {
        Self::with_options(RequestBinOptions::default())
    }

    pub fn with_options(options: RequestBinOptions) -> Self {
        let renderer: Arc<dyn HistoryRenderer> =
            Arc::new(HtmlRenderer::new(options.clone()).expect("Failed to create renderer"));
        let store = Arc::new(MockBinStore::new());

        let state = AppState::new(store.clone() as SharedBinStore, renderer, options);
        let router = router(state);

        Self { store, router }
    }

    /// Set the mock store to fail deliveries (for error testing).
    pub fn set_delivery_failure(&self, should_fail: bool) {
        self.store.set_fail_delivery(should_fail);
    }

    /// Set the mock store to time out reads (for error testing).
    pub fn set_read_timeout(&self, should_fail: bool) {
        self.store.set_fail_read_timeout(should_fail);
    }
}

impl Default for MockContext {
    fn default() -> Self {
        Self::new()
    }
}
