//! CPU usage sampling for a single process.
//!
//! A sample is the cumulative tick count from `/proc/<pid>/stat` paired
//! with a monotonic timestamp. Two samples taken some interval apart give
//! the share of one CPU the process consumed in between.

use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::error::{InspectError, Result};
use crate::process::stat::StatRecord;

/// Cumulative CPU ticks of a process at a point in time.
#[derive(Debug, Clone, Copy)]
pub struct CpuTimeSample {
    pub ticks: u64,
    pub taken_at: Instant,
}

/// Reads one sample from a stat record.
pub fn read_cpu_sample(stat_path: &Path) -> Result<CpuTimeSample> {
    let content =
        fs::read_to_string(stat_path).map_err(|e| InspectError::read(stat_path, e))?;
    let taken_at = Instant::now();
    let ticks = StatRecord::parse(&content, stat_path)?.cpu_ticks()?;
    Ok(CpuTimeSample { ticks, taken_at })
}

/// Converts two samples into a CPU percentage.
///
/// The result may exceed 100 for processes running on several cores.
/// Returns `None` when both samples carry the same timestamp. A tick count
/// that went backwards is treated as no usage.
pub fn cpu_percent_between(
    first: &CpuTimeSample,
    second: &CpuTimeSample,
    clock_ticks: u64,
) -> Option<f64> {
    let elapsed = second
        .taken_at
        .saturating_duration_since(first.taken_at)
        .as_secs_f64();
    if elapsed <= 0.0 || clock_ticks == 0 {
        return None;
    }

    let cpu_seconds = second.ticks.saturating_sub(first.ticks) as f64 / clock_ticks as f64;
    Some(cpu_seconds / elapsed * 100.0)
}
