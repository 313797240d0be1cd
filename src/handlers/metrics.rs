//! Metrics endpoint handler for Prometheus scraping.
//!
//! This module provides the `/metrics` endpoint handler that refreshes the
//! process snapshot when it is stale and returns the registry in
//! Prometheus text format.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use prometheus::{Encoder, TextEncoder};
use tracing::{debug, error, instrument};

use crate::cache_updater::update_cache;
use crate::state::SharedState;

/// Buffer capacity for metrics encoding.
const BUFFER_CAP: usize = 16 * 1024;

/// Error type for metrics endpoint failures.
#[derive(Debug)]
pub enum MetricsError {
    EncodingFailed,
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to encode metrics",
        )
            .into_response()
    }
}

/// Handler for the /metrics endpoint.
#[instrument(skip(state))]
pub async fn metrics_handler(State(state): State<SharedState>) -> Result<String, MetricsError> {
    debug!("Processing /metrics request");

    let (has_snapshot, stale) = {
        let cache = state.cache.read().await;
        (cache.snapshot.is_some(), cache.needs_refresh(state.cache_ttl))
    };

    if !has_snapshot {
        // First scrape: wait so the response carries real values.
        if let Err(e) = update_cache(&state).await {
            error!("Snapshot update failed: {}", e);
        }
    } else if stale {
        debug!("Snapshot stale, refreshing in background");
        let state_clone = state.clone();
        tokio::spawn(async move {
            if let Err(e) = update_cache(&state_clone).await {
                error!("Background snapshot update failed: {}", e);
            }
        });
    }

    let mut buffer = Vec::with_capacity(BUFFER_CAP);
    TextEncoder::new()
        .encode(&state.registry.gather(), &mut buffer)
        .map_err(|e| {
            error!("Failed to encode metrics: {}", e);
            MetricsError::EncodingFailed
        })?;

    String::from_utf8(buffer).map_err(|e| {
        error!("Metrics output is not UTF-8: {}", e);
        MetricsError::EncodingFailed
    })
}
