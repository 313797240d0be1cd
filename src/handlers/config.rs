//! Configuration display endpoint handler.
//!
//! This module provides the `/config` endpoint handler that displays
//! the current inspector configuration.

use axum::{extract::State, response::IntoResponse};
use std::fmt::Write as FmtWrite;
use tracing::{debug, instrument};

use crate::config::{DEFAULT_BIND_ADDR, DEFAULT_CACHE_TTL, DEFAULT_PORT};
use crate::handlers::health::FOOTER_TEXT;
use crate::state::SharedState;

/// Handler for the /config endpoint.
#[instrument(skip(state))]
pub async fn config_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /config request");

    let cfg = &state.config;
    let inspector = &state.inspector;
    let host = inspector.host();

    let mut out = String::new();

    writeln!(out, "HERAKLES PROC INSPECTOR - CONFIGURATION").ok();
    writeln!(out, "=======================================").ok();
    writeln!(out).ok();

    writeln!(out, "TARGET").ok();
    writeln!(out, "------").ok();
    writeln!(out, "pid:                        {}", inspector.pid()).ok();
    writeln!(out, "proc_root:                  {}", inspector.proc_root().display()).ok();
    writeln!(
        out,
        "sample_interval:            {} ms",
        inspector.sample_interval().as_millis()
    )
    .ok();
    writeln!(out, "window:                     {} seconds", inspector.window()).ok();
    writeln!(out, "clock_ticks:                {} Hz", host.clock_ticks).ok();
    writeln!(out, "page_size:                  {} bytes", host.page_size).ok();
    writeln!(out).ok();

    writeln!(out, "SERVER CONFIGURATION").ok();
    writeln!(out, "--------------------").ok();
    writeln!(
        out,
        "bind:                       {}",
        cfg.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    )
    .ok();
    writeln!(
        out,
        "port:                       {}",
        cfg.port.unwrap_or(DEFAULT_PORT)
    )
    .ok();
    writeln!(
        out,
        "cache_ttl:                  {} seconds",
        cfg.cache_ttl.unwrap_or(DEFAULT_CACHE_TTL)
    )
    .ok();
    writeln!(
        out,
        "enable_health:              {}",
        cfg.enable_health.unwrap_or(true)
    )
    .ok();
    writeln!(
        out,
        "log_level:                  {}",
        cfg.log_level.as_deref().unwrap_or("info")
    )
    .ok();
    writeln!(out).ok();
    writeln!(out, "{}", FOOTER_TEXT).ok();

    out
}
