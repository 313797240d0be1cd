//! Error types for process inspection.
//!
//! Every query on [`crate::ProcessInspector`] returns [`Result`]. Read
//! failures and malformed kernel records always surface here; the only
//! best-effort query is the I/O accounting record, which reports
//! [`IoStatus::Unavailable`](crate::process::IoStatus) instead.

use std::io;
use std::path::PathBuf;

/// Errors raised while reading or parsing `/proc` records.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    /// A required record is missing or unreadable. This is also what a
    /// process exiting mid-query looks like.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The record exists but does not have the expected shape.
    #[error("malformed record {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// `sysconf` could not report a host constant.
    #[error("host constant {name} unavailable: {source}")]
    HostConstant {
        name: &'static str,
        #[source]
        source: io::Error,
    },

    /// Both CPU samples carry the same timestamp, so no rate exists yet.
    #[error("no time elapsed between CPU samples")]
    NoElapsedTime,
}

impl InspectError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns true when the underlying cause is a missing file, which for
    /// per-process records usually means the process has exited.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, InspectError>;
