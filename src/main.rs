//! Request Bin Service
//!
//! Captures inbound HTTP requests into named bins and serves each bin's
//! history as an HTML page:
//! - ANY /{bin_id} records the request
//! - GET /history/{bin_id} renders the captured history
//! - DELETE /history/{bin_id} empties the bin

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use api::{router, AppState};
use bin_core::RequestBinOptions;
use registry::{start_retention_sweeper, BinRegistry, RegistryConfig, SharedBinStore};
use render::HtmlRenderer;
use telemetry::{health, init_tracing_from_env, start_snapshot_logger};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Capture behavior: history size, body budget, excluded headers, theme
    #[serde(default)]
    bin: RequestBinOptions,

    /// Store behavior: mailbox size, read timeout, idle retention
    #[serde(default)]
    registry: RegistryConfig,

    /// Seconds between metrics snapshot log lines
    #[serde(default = "default_metrics_interval_secs")]
    metrics_interval_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_metrics_interval_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bin: RequestBinOptions::default(),
            registry: RegistryConfig::default(),
            metrics_interval_secs: default_metrics_interval_secs(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting Request Bin Service v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;
    config.bin.validate().context("Invalid bin options")?;

    info!(
        max_size = config.bin.max_size,
        max_body_length = config.bin.max_body_length,
        renderer = %config.bin.renderer_template,
        read_timeout_ms = config.registry.read_timeout_ms,
        "Loaded bin config"
    );

    // Initialize the history renderer; an unknown template name fails
    // startup rather than the first page view.
    let renderer = Arc::new(
        HtmlRenderer::new(config.bin.clone()).context("Failed to initialize history renderer")?,
    );
    health().renderer.set_healthy();

    // Initialize the bin registry
    let bin_registry = Arc::new(BinRegistry::new(
        config.bin.clone(),
        config.registry.clone(),
    ));
    health().registry.set_healthy();

    // Start the idle-bin sweeper (no-op unless a TTL is configured)
    let _sweeper_handle =
        start_retention_sweeper(bin_registry.clone(), config.registry.retention.clone());

    // Start the metrics snapshot logger
    let _metrics_handle =
        start_snapshot_logger(Duration::from_secs(config.metrics_interval_secs));

    // Create application state
    let store: SharedBinStore = bin_registry.clone();
    let state = AppState::new(store, renderer, config.bin.clone());

    // Create router
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown. Connect info feeds the source-ip
    // fallback when no proxy headers are present.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("REQUEST_BIN")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested bin options from environment
    // The config crate's nested parsing doesn't work reliably with underscored field names
    if let Ok(max_size) = std::env::var("REQUEST_BIN_MAX_SIZE") {
        config.bin.max_size = max_size
            .parse()
            .context("REQUEST_BIN_MAX_SIZE must be a number")?;
    }
    if let Ok(max_body_length) = std::env::var("REQUEST_BIN_MAX_BODY_LENGTH") {
        config.bin.max_body_length = max_body_length
            .parse()
            .context("REQUEST_BIN_MAX_BODY_LENGTH must be a number")?;
    }
    if let Ok(excluded) = std::env::var("REQUEST_BIN_EXCLUDED_HEADERS") {
        config.bin.excluded_headers = excluded
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(renderer) = std::env::var("REQUEST_BIN_RENDERER") {
        config.bin.renderer_template = renderer;
    }

    // Manual overrides for nested registry config
    if let Ok(timeout) = std::env::var("REQUEST_BIN_READ_TIMEOUT_MS") {
        config.registry.read_timeout_ms = timeout
            .parse()
            .context("REQUEST_BIN_READ_TIMEOUT_MS must be a number")?;
    }
    if let Ok(ttl) = std::env::var("REQUEST_BIN_IDLE_TTL_SECS") {
        config.registry.retention.idle_ttl_secs = Some(
            ttl.parse()
                .context("REQUEST_BIN_IDLE_TTL_SECS must be a number")?,
        );
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
