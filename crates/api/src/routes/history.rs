//! History page and clear endpoints.
//!
//! `GET /history/{bin_id}` answers with HTML in every case, including
//! validation and store failures, so a browser always gets a page. The
//! `DELETE` endpoint follows the JSON error convention of the rest of the
//! API.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, error, info};
use uuid::Uuid;

use bin_core::BinId;
use telemetry::metrics;

use crate::response::ApiError;
use crate::state::AppState;

/// GET /history/{bin_id} - Renders the bin's capture history.
pub async fn get_history_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let bin_url = bin_url(&uri, &headers);

    let bin_id = match BinId::parse(&raw_id) {
        Ok(id) => id,
        Err(err) => {
            metrics().invalid_bin_ids.inc();
            let message = validation_message(&err);
            debug!(bin_id = %raw_id, error = %message, "Rejected history view for invalid bin id");
            return error_page(&state, &raw_id, &bin_url, StatusCode::BAD_REQUEST, &message);
        }
    };

    let snapshot = match state.store.read(&bin_id).await {
        Ok(snapshot) => snapshot,
        Err(err) => return failure_page(&state, bin_id.as_str(), &bin_url, &err),
    };

    match state
        .renderer
        .render_history(bin_id.as_str(), &bin_url, &snapshot)
    {
        Ok(page) => {
            info!(bin_id = %bin_id, records = snapshot.len(), "Rendered history page");
            Html(page).into_response()
        }
        Err(err) => failure_page(&state, bin_id.as_str(), &bin_url, &err),
    }
}

/// DELETE /history/{bin_id} - Empties the bin.
///
/// Clearing a bin that was never written (or is already empty) succeeds.
pub async fn empty_history_handler(
    State(state): State<AppState>,
    Path(bin_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let bin_id = BinId::parse(&bin_id).map_err(|e| {
        metrics().invalid_bin_ids.inc();
        ApiError::from(e)
    })?;

    state.store.clear(&bin_id).await.map_err(|e| {
        error!(bin_id = %bin_id, error = %e, "Failed to clear bin");
        ApiError::from(e)
    })?;

    info!(bin_id = %bin_id, "Cleared bin history");
    Ok(StatusCode::OK)
}

/// Public URL of the bin, reconstructed from the request.
///
/// The `/history` prefix is stripped once so the page can tell callers
/// where to send requests. Scheme comes from X-Forwarded-Proto when a
/// proxy terminates TLS in front of us.
fn bin_url(uri: &Uri, headers: &HeaderMap) -> String {
    let scheme = headers
        .get("X-Forwarded-Proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let path = uri.path().strip_prefix("/history").unwrap_or(uri.path());
    format!("{scheme}://{host}{path}")
}

fn validation_message(err: &bin_core::Error) -> String {
    match err {
        bin_core::Error::InvalidBinId(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Store or render failure as a page: status reason plus an error id that
/// can be grepped out of the logs.
fn failure_page(
    state: &AppState,
    bin_id: &str,
    bin_url: &str,
    err: &bin_core::Error,
) -> Response {
    let status = StatusCode::from_u16(err.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let error_id = Uuid::new_v4();
    error!(bin_id = %bin_id, error_id = %error_id, error = %err, "History page failed");

    let message = format!(
        "{} {}. Execution Id: '{}'",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Internal Server Error"),
        error_id
    );
    error_page(state, bin_id, bin_url, status, &message)
}

/// Renders the error page; falls back to plain text when even that fails.
fn error_page(
    state: &AppState,
    bin_id: &str,
    bin_url: &str,
    status: StatusCode,
    message: &str,
) -> Response {
    match state.renderer.render_error(bin_id, bin_url, message) {
        Ok(page) => (status, Html(page)).into_response(),
        Err(render_err) => {
            error!(bin_id = %bin_id, error = %render_err, "Failed to render error page");
            (status, message.to_string()).into_response()
        }
    }
}
