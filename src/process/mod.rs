//! Parsers for per-process and connection-table records under `/proc`.
//!
//! This module provides:
//! - `stat`: `/proc/<pid>/stat` fields (CPU ticks, thread count)
//! - `memory`: `/proc/<pid>/statm` page counts
//! - `cpu`: CPU time samples and the usage percentage between two of them
//! - `io`: `/proc/<pid>/io` accounting
//! - `fd`: descriptor listing and `socket:[inode]` resolution
//! - `net`: `/proc/net/*` connection tables and socket classification

pub mod cpu;
pub mod fd;
pub mod io;
pub mod memory;
pub mod net;
pub mod stat;

// Re-export commonly used types
pub use cpu::{cpu_percent_between, read_cpu_sample, CpuTimeSample};
pub use fd::{count_fds, parse_socket_inode, socket_inodes};
pub use io::{parse_io, IoCounters, IoStatus, IO_LABELS};
pub use memory::{parse_statm, MemoryUsage};
pub use net::{ConnectionIndex, SocketClassification, SocketFamily};
pub use stat::StatRecord;
