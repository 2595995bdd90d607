//! API routes.

pub mod capture;
pub mod health;
pub mod history;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Creates the API router.
///
/// Static paths win over the capture wildcard, so `/health` stays a probe
/// while everything else under `/` is a bin.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .route(
            "/history/:bin_id",
            get(history::get_history_handler).delete(history::empty_history_handler),
        )
        .route("/:bin_id", any(capture::capture_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
