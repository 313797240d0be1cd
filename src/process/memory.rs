//! Memory usage parsing from `/proc/<pid>/statm`.

use serde::Serialize;
use std::path::Path;

use crate::error::{InspectError, Result};

/// `size`: total program size in pages.
pub const STATM_TOTAL_FIELD: usize = 0;
/// `resident`: resident set size in pages.
pub const STATM_RESIDENT_FIELD: usize = 1;
/// `shared`: resident pages backed by a file.
pub const STATM_SHARED_FIELD: usize = 2;

/// Memory footprint of a process in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    pub total: u64,
    pub resident: u64,
    pub shared: u64,
}

impl MemoryUsage {
    /// Kernel data should always satisfy resident <= total.
    pub fn is_consistent(&self) -> bool {
        self.resident <= self.total
    }
}

/// Parses a statm record and converts its page counts to bytes.
pub fn parse_statm(content: &str, page_size: u64, path: &Path) -> Result<MemoryUsage> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    if fields.len() <= STATM_SHARED_FIELD {
        return Err(InspectError::malformed(
            path,
            format!(
                "expected at least {} fields, got {}",
                STATM_SHARED_FIELD + 1,
                fields.len()
            ),
        ));
    }

    let pages = |idx: usize| -> Result<u64> {
        fields[idx].parse::<u64>().map_err(|_| {
            InspectError::malformed(
                path,
                format!("field {idx} is not an integer: {:?}", fields[idx]),
            )
        })
    };

    Ok(MemoryUsage {
        total: pages(STATM_TOTAL_FIELD)?.saturating_mul(page_size),
        resident: pages(STATM_RESIDENT_FIELD)?.saturating_mul(page_size),
        shared: pages(STATM_SHARED_FIELD)?.saturating_mul(page_size),
    })
}
