//! Capture endpoint handler.
//!
//! Any HTTP method hitting `/{bin_id}` gets recorded: method, path with
//! query string, source IP, headers, query parameters, and the leading
//! slice of the body. The response is an empty 200 so webhook senders
//! treat the delivery as accepted.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::StatusCode,
};
use chrono::Utc;
use http_body_util::BodyExt;
use tracing::{debug, error, info};
use url::form_urlencoded;

use bin_core::{BinId, Error, RequestBinOptions, RequestRecord};
use telemetry::metrics;

use crate::extractors::ClientIp;
use crate::response::ApiError;
use crate::state::AppState;

/// ANY /{bin_id} - Records the incoming request into the bin's history.
pub async fn capture_handler(
    State(state): State<AppState>,
    Path(bin_id): Path<String>,
    ClientIp(client_ip): ClientIp,
    request: Request,
) -> Result<StatusCode, ApiError> {
    let start = Instant::now();

    let bin_id = BinId::parse(&bin_id).map_err(|e| {
        metrics().invalid_bin_ids.inc();
        debug!(error = %e, "Rejected capture for invalid bin id");
        ApiError::from(e)
    })?;

    let record = describe_request(request, client_ip, &state.options)
        .await
        .map_err(|e| {
            metrics().capture_failures.inc();
            error!(bin_id = %bin_id, error = %e, "Failed to read request");
            ApiError::from(e)
        })?;

    let method = record.method.clone();
    state.store.append(&bin_id, record).await.map_err(|e| {
        error!(bin_id = %bin_id, error = %e, "Failed to store request");
        ApiError::from(e)
    })?;

    metrics().requests_captured.inc();
    let latency_ms = start.elapsed().as_millis() as u64;
    metrics().capture_latency_ms.observe(latency_ms);

    info!(
        bin_id = %bin_id,
        method = %method,
        latency_ms = latency_ms,
        "Captured request"
    );

    Ok(StatusCode::OK)
}

/// Builds the stored description of an inbound request.
///
/// Method and path go in verbatim, query string included. Headers and query
/// parameters keep their wire order; excluded headers are dropped. The body
/// is read up to `options.max_body_length` bytes and the remainder is never
/// pulled off the socket.
pub async fn describe_request(
    request: Request,
    source_ip: String,
    options: &RequestBinOptions,
) -> Result<RequestRecord, Error> {
    let (parts, body) = request.into_parts();

    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let query_params = parts
        .uri
        .query()
        .map(|q| {
            form_urlencoded::parse(q.as_bytes())
                .map(|(name, value)| (name.into_owned(), value.into_owned()))
                .collect()
        })
        .unwrap_or_default();

    let headers = parts
        .headers
        .iter()
        .filter(|(name, _)| !options.is_excluded_header(name.as_str()))
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let (body, truncated) = read_body(body, options.max_body_length).await?;
    if truncated {
        metrics().bodies_truncated.inc();
    }

    Ok(RequestRecord {
        method: parts.method.as_str().to_string(),
        path,
        source_ip,
        timestamp: Utc::now(),
        headers,
        query_params,
        body,
    })
}

/// Reads at most `max_len` bytes of the body, decoding as UTF-8.
///
/// Returns the text and whether the body was cut short. A cut landing
/// inside a multi-byte character drops the partial character instead of
/// emitting a replacement char.
async fn read_body(mut body: Body, max_len: usize) -> Result<(String, bool), Error> {
    let mut buf: Vec<u8> = Vec::new();
    let mut truncated = false;

    while let Some(frame) = body.frame().await {
        let frame =
            frame.map_err(|e| Error::capture(format!("failed to read request body: {e}")))?;
        let Some(data) = frame.data_ref() else {
            continue;
        };
        let remaining = max_len - buf.len();
        if data.len() > remaining {
            buf.extend_from_slice(&data[..remaining]);
            truncated = true;
            break;
        }
        buf.extend_from_slice(data);
    }

    let text = match std::str::from_utf8(&buf) {
        Ok(s) => s.to_string(),
        // error_len() is None when the buffer ends mid-character, which is
        // the byte-budget cut; drop the partial tail.
        Err(e) if truncated && e.error_len().is_none() => {
            String::from_utf8_lossy(&buf[..e.valid_up_to()]).into_owned()
        }
        Err(_) => String::from_utf8_lossy(&buf).into_owned(),
    };

    Ok((text, truncated))
}
