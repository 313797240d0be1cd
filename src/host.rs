//! Host constants captured once per inspector.

use serde::Serialize;
use std::io;

use crate::error::{InspectError, Result};

/// Clock-tick frequency and memory page size of the running host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HostConstants {
    /// Scheduler ticks per second (`_SC_CLK_TCK`).
    pub clock_ticks: u64,
    /// Memory page size in bytes (`_SC_PAGESIZE`).
    pub page_size: u64,
}

impl HostConstants {
    /// Queries both constants from the operating system.
    ///
    /// There is no fallback: a host that cannot report either value cannot
    /// produce meaningful CPU or memory figures.
    pub fn query() -> Result<Self> {
        Ok(Self {
            clock_ticks: sysconf("_SC_CLK_TCK", libc::_SC_CLK_TCK)?,
            page_size: sysconf("_SC_PAGESIZE", libc::_SC_PAGESIZE)?,
        })
    }
}

fn sysconf(name: &'static str, var: libc::c_int) -> Result<u64> {
    // SAFETY: sysconf has no memory-safety preconditions. It returns -1 on
    // error and 0 when the variable is undefined.
    let value = unsafe { libc::sysconf(var) };
    if value > 0 {
        return Ok(value as u64);
    }

    let source = if value < 0 {
        io::Error::last_os_error()
    } else {
        io::Error::other("sysconf returned 0")
    };
    Err(InspectError::HostConstant { name, source })
}
