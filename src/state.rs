//! Application state management for the exporter.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers and used by the cache updater.

use herakles_proc_inspector::ProcessInspector;
use prometheus::Registry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::cache::SnapshotCache;
use crate::config::Config;
use crate::metrics::ProcessMetrics;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests.
pub struct AppState {
    pub registry: Registry,
    pub metrics: ProcessMetrics,
    pub inspector: Arc<ProcessInspector>,
    pub cache: RwLock<SnapshotCache>,
    pub config: Arc<Config>,
    pub cache_ttl: Duration,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}
