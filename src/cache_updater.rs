//! Snapshot refresh for the metrics exporter.
//!
//! Sampling blocks for the CPU interval, so it runs on tokio's blocking
//! pool and the async side only waits for the result.

use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::state::SharedState;

/// Takes a fresh snapshot and stores it in the cache.
#[instrument(skip(state))]
pub async fn update_cache(state: &SharedState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    {
        let mut cache = state.cache.write().await;
        if cache.is_updating {
            debug!("Snapshot already in progress");
            return Ok(());
        }
        cache.is_updating = true;
    }

    let start = Instant::now();
    let inspector = state.inspector.clone();
    let result = tokio::task::spawn_blocking(move || inspector.snapshot()).await;
    let duration = start.elapsed().as_secs_f64();

    let mut cache = state.cache.write().await;
    cache.is_updating = false;
    cache.last_updated = Some(Instant::now());
    cache.update_duration_seconds = duration;
    state.metrics.snapshot_duration_seconds.set(duration);

    let outcome = match result {
        Ok(Ok(snapshot)) => {
            state.metrics.observe(&snapshot);
            cache.snapshot = Some(snapshot);
            cache.update_success = true;
            cache.last_error = None;
            debug!("Snapshot of pid {} took {:.3}s", state.inspector.pid(), duration);
            Ok(())
        }
        Ok(Err(e)) => {
            error!("Snapshot of pid {} failed: {}", state.inspector.pid(), e);
            state.metrics.clear();
            cache.snapshot = None;
            cache.update_success = false;
            cache.last_error = Some(e.to_string());
            Err(e.into())
        }
        Err(join_err) => {
            error!("Snapshot task panicked: {}", join_err);
            state.metrics.clear();
            cache.snapshot = None;
            cache.update_success = false;
            cache.last_error = Some(join_err.to_string());
            Err(join_err.into())
        }
    };

    state
        .metrics
        .snapshot_success
        .set(if cache.update_success { 1.0 } else { 0.0 });
    outcome
}
