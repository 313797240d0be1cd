//! Herakles Process Inspector Library
//!
//! Live resource usage of a single Linux process, read from `/proc` alone:
//! no agents, no privileged calls, nothing written back to the host.
//!
//! # Features
//!
//! - **Memory**: total, resident and shared bytes from `statm`
//! - **CPU**: usage percentage from two tick samples half a second apart
//! - **I/O**: accounting counters from `io` (best effort, often permission-gated)
//! - **Descriptors and threads**: open fd count and `num_threads`
//! - **Sockets**: the process's socket descriptors counted per family
//!   (tcp, tcp6, udp, udp6, unix) by matching inodes against `/proc/net`
//!
//! # Usage
//!
//! ```no_run
//! use herakles_proc_inspector::{InspectorOptions, ProcessInspector};
//!
//! let inspector = ProcessInspector::new(InspectorOptions::for_pid(1104))?;
//!
//! println!("Network connections {:?}", inspector.socket_classification()?);
//! println!("Threads {}", inspector.thread_count()?);
//! println!("File descriptors {}", inspector.open_fd_count()?);
//! println!("Percent CPU {:.1}", inspector.cpu_usage_percent()?);
//! println!("IO information {:?}", inspector.io_counters()?);
//! println!("Memory usage {:?}", inspector.memory_usage()?);
//! # Ok::<(), herakles_proc_inspector::InspectError>(())
//! ```

pub mod error;
pub mod host;
pub mod inspector;
pub mod process;
pub mod snapshot;

// Re-export main types for convenience
pub use error::{InspectError, Result};
pub use host::HostConstants;
pub use inspector::{InspectorOptions, ProcessInspector};
pub use process::{
    IoCounters, IoStatus, MemoryUsage, SocketClassification, SocketFamily,
};
pub use snapshot::ProcessSnapshot;
