//! Root endpoint handler listing the available endpoints.

use axum::{extract::State, response::IntoResponse};
use std::fmt::Write as FmtWrite;
use tracing::{debug, instrument};

use crate::handlers::health::FOOTER_TEXT;
use crate::state::SharedState;

/// Handler for the root `/` endpoint.
#[instrument(skip(state))]
pub async fn root_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing / request");

    let version = env!("CARGO_PKG_VERSION");

    let uptime_secs = state.start_time.elapsed().as_secs();
    let hours = uptime_secs / 3600;
    let minutes = (uptime_secs % 3600) / 60;
    let seconds = uptime_secs % 60;

    let mut out = String::new();
    writeln!(out, "herakles-proc-inspector {}", version).ok();
    writeln!(out, "target pid: {}", state.inspector.pid()).ok();
    writeln!(out, "uptime: {}h {}m {}s", hours, minutes, seconds).ok();
    writeln!(out).ok();
    writeln!(out, "Endpoints:").ok();
    writeln!(out, "  /metrics  Prometheus metrics for the target process").ok();
    if state.config.enable_health.unwrap_or(true) {
        writeln!(out, "  /health   Status of the last snapshot").ok();
    }
    writeln!(out, "  /config   Effective configuration").ok();
    writeln!(out).ok();
    writeln!(out, "{}", FOOTER_TEXT).ok();
    out
}
