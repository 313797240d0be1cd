//! Health check endpoint handler.
//!
//! This module provides the `/health` endpoint handler that reports
//! whether the last snapshot of the target process succeeded.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::fmt::Write as FmtWrite;
use tracing::{debug, instrument};

use crate::state::SharedState;

/// Footer text for human-readable HTTP endpoints.
pub const FOOTER_TEXT: &str = "Project: https://github.com/cansp-dev/herakles-proc-inspector - More info: https://www.herakles.now - Support: exporter@herakles.now";

/// Handler for the /health endpoint.
#[instrument(skip(state))]
pub async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /health request");

    let cache = state.cache.read().await;

    let status = if cache.update_success && cache.last_updated.is_some() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let message = if cache.last_updated.is_none() {
        "No snapshot yet"
    } else if cache.update_success {
        "OK"
    } else {
        "Snapshot failed"
    };

    let mut out = String::new();
    writeln!(out, "HERAKLES PROC INSPECTOR - HEALTH").ok();
    writeln!(out, "================================").ok();
    writeln!(out).ok();
    writeln!(out, "status:                {}", message).ok();
    writeln!(out, "pid:                   {}", state.inspector.pid()).ok();
    writeln!(out, "uptime_seconds:        {}", state.start_time.elapsed().as_secs()).ok();
    if let Some(updated) = cache.last_updated {
        writeln!(out, "last_snapshot_age_s:   {:.1}", updated.elapsed().as_secs_f64()).ok();
        writeln!(out, "last_snapshot_took_s:  {:.3}", cache.update_duration_seconds).ok();
    }
    if let Some(err) = &cache.last_error {
        writeln!(out, "last_error:            {}", err).ok();
    }
    if let Some(snap) = &cache.snapshot {
        writeln!(out, "io_record:             {}", if snap.io.is_available() { "available" } else { "unavailable" }).ok();
    }
    writeln!(out).ok();
    writeln!(out, "{}", FOOTER_TEXT).ok();

    (status, out)
}
