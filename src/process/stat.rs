//! Parser for `/proc/<pid>/stat`.
//!
//! The record is one line of space-separated fields whose meaning is fixed
//! by position (see `proc_pid_stat(5)`). Every index used by this crate is
//! a named constant below; if the kernel ever reorders the record, these
//! are the only lines to change.

use std::path::Path;

use crate::error::{InspectError, Result};

/// `utime`: ticks scheduled in user mode.
pub const UTIME_FIELD: usize = 13;
/// `stime`: ticks scheduled in kernel mode.
pub const STIME_FIELD: usize = 14;
/// `cutime`: user-mode ticks of waited-for children.
pub const CUTIME_FIELD: usize = 15;
/// `cstime`: kernel-mode ticks of waited-for children.
pub const CSTIME_FIELD: usize = 16;
/// `num_threads`: threads in the process.
pub const NUM_THREADS_FIELD: usize = 19;

/// Fields summed into a CPU time sample.
pub const CPU_TICK_FIELDS: [usize; 4] = [UTIME_FIELD, STIME_FIELD, CUTIME_FIELD, CSTIME_FIELD];

/// Shortest record that still carries every field above.
pub const MIN_STAT_FIELDS: usize = NUM_THREADS_FIELD + 1;

/// A split `/proc/<pid>/stat` line.
#[derive(Debug)]
pub struct StatRecord<'a> {
    path: &'a Path,
    fields: Vec<&'a str>,
}

impl<'a> StatRecord<'a> {
    /// Splits `content` into fields and checks that the record is long enough.
    pub fn parse(content: &'a str, path: &'a Path) -> Result<Self> {
        let fields = split_stat_fields(content);
        if fields.len() < MIN_STAT_FIELDS {
            return Err(InspectError::malformed(
                path,
                format!(
                    "expected at least {} fields, got {}",
                    MIN_STAT_FIELDS,
                    fields.len()
                ),
            ));
        }
        Ok(Self { path, fields })
    }

    /// Returns the unsigned integer at `index`.
    pub fn field(&self, index: usize) -> Result<u64> {
        let raw = self.fields.get(index).ok_or_else(|| {
            InspectError::malformed(
                self.path,
                format!("field {} missing ({} fields)", index, self.fields.len()),
            )
        })?;
        raw.parse().map_err(|_| {
            InspectError::malformed(self.path, format!("field {index} is not an integer: {raw:?}"))
        })
    }

    /// Sum of the four scheduler tick counters.
    pub fn cpu_ticks(&self) -> Result<u64> {
        CPU_TICK_FIELDS
            .iter()
            .try_fold(0u64, |acc, &idx| Ok(acc.saturating_add(self.field(idx)?)))
    }

    /// Number of threads in the process.
    pub fn thread_count(&self) -> Result<u64> {
        self.field(NUM_THREADS_FIELD)
    }

    /// Number of fields found in the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Splits the first line of a stat record into fields.
///
/// Field 1 (`comm`) is wrapped in parentheses and may itself contain spaces
/// or parentheses, so it is taken verbatim up to the last `)`. Everything
/// after that is plain whitespace-separated, which keeps the documented
/// indices valid for any process name.
pub fn split_stat_fields(content: &str) -> Vec<&str> {
    let line = content.lines().next().unwrap_or("");
    match (line.find('('), line.rfind(')')) {
        (Some(open), Some(close)) if open < close => {
            let mut fields = Vec::with_capacity(64);
            fields.extend(line[..open].split_whitespace());
            fields.push(&line[open..=close]);
            fields.extend(line[close + 1..].split_whitespace());
            fields
        }
        _ => line.split_whitespace().collect(),
    }
}
