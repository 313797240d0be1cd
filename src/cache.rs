//! Cache for the most recent process snapshot.
//!
//! A snapshot takes at least one CPU sampling interval, so scrapes are
//! served from here and refreshed once the cache is older than the TTL.

use herakles_proc_inspector::ProcessSnapshot;
use std::time::{Duration, Instant};

/// Cache state with update timing information.
#[derive(Clone, Default)]
pub struct SnapshotCache {
    pub snapshot: Option<ProcessSnapshot>,
    pub last_updated: Option<Instant>,
    pub update_duration_seconds: f64,
    pub update_success: bool,
    pub last_error: Option<String>,
    pub is_updating: bool,
}

impl SnapshotCache {
    /// True when no update is running and the cache is empty or older than `ttl`.
    pub fn needs_refresh(&self, ttl: Duration) -> bool {
        !self.is_updating
            && self
                .last_updated
                .map(|t| t.elapsed() >= ttl)
                .unwrap_or(true)
    }
}
