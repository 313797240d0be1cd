//! All metrics of a process collected in one pass.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::{InspectError, Result};
use crate::inspector::ProcessInspector;
use crate::process::{IoStatus, MemoryUsage, SocketClassification};

/// Point-in-time view of one process.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub collected_at: DateTime<Utc>,
    /// `None` when the CPU samples could not be told apart in time.
    pub cpu_percent: Option<f64>,
    pub open_fds: usize,
    pub threads: u64,
    // Nested records last so the TOML rendering stays valid
    pub memory: MemoryUsage,
    pub io: IoStatus,
    pub sockets: SocketClassification,
}

impl ProcessInspector {
    /// Runs every query once. Blocks for the CPU sampling interval.
    ///
    /// Any failing query fails the snapshot, except for the I/O record
    /// (reported as unavailable) and a zero-length CPU interval.
    pub fn snapshot(&self) -> Result<ProcessSnapshot> {
        let collected_at = Utc::now();
        let sockets = self.socket_classification()?;
        let threads = self.thread_count()?;
        let open_fds = self.open_fd_count()?;
        let io = self.io_counters()?;
        let memory = self.memory_usage()?;

        let cpu_percent = match self.cpu_usage_percent() {
            Ok(pct) => Some(pct),
            Err(InspectError::NoElapsedTime) => {
                debug!("pid {}: CPU samples too close together", self.pid());
                None
            }
            Err(e) => return Err(e),
        };

        Ok(ProcessSnapshot {
            pid: self.pid(),
            collected_at,
            cpu_percent,
            open_fds,
            threads,
            memory,
            io,
            sockets,
        })
    }
}
