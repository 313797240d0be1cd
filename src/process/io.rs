//! I/O accounting from `/proc/<pid>/io`.
//!
//! The record is usually readable only by the process owner (and needs
//! `CAP_SYS_PTRACE` for others), so the inspector treats an unreadable
//! record as [`IoStatus::Unavailable`] rather than an error.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{InspectError, Result};

/// Labels the kernel writes to `/proc/<pid>/io`.
pub const IO_LABELS: [&str; 7] = [
    "rchar",
    "wchar",
    "syscr",
    "syscw",
    "read_bytes",
    "write_bytes",
    "cancelled_write_bytes",
];

/// Cumulative I/O counters keyed by label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IoCounters(BTreeMap<String, u64>);

impl IoCounters {
    pub fn get(&self, label: &str) -> Option<u64> {
        self.0.get(label).copied()
    }

    /// Adds `value` to `label`, creating it when absent.
    pub fn add(&mut self, label: &str, value: u64) {
        let slot = self.0.entry(label.to_string()).or_insert(0);
        *slot = slot.saturating_add(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome of the best-effort I/O query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IoStatus {
    Available { counters: IoCounters },
    /// The record could not be opened, typically for lack of permission.
    Unavailable { reason: String },
}

impl IoStatus {
    pub fn counters(&self) -> Option<&IoCounters> {
        match self {
            IoStatus::Available { counters } => Some(counters),
            IoStatus::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, IoStatus::Available { .. })
    }
}

/// Parses `label: value` lines. Repeated labels are summed.
pub fn parse_io(content: &str, path: &Path) -> Result<IoCounters> {
    let mut counters = IoCounters::default();

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (label, value) = line.split_once(':').ok_or_else(|| {
            InspectError::malformed(path, format!("line {}: missing ':' in {:?}", lineno + 1, line))
        })?;
        let label = label.trim();
        let value: u64 = value.trim().parse().map_err(|_| {
            InspectError::malformed(
                path,
                format!("line {}: {} is not an integer: {:?}", lineno + 1, label, value.trim()),
            )
        })?;

        counters.add(label, value);
    }

    Ok(counters)
}
