//! The process inspector: one query per metric category.
//!
//! Every query reads the kernel records fresh; the inspector itself only
//! holds the target PID, the host constants and its sampling settings.
//! All queries block. [`ProcessInspector::cpu_usage_percent`] additionally
//! sleeps for the sampling interval, so async callers should run it on a
//! blocking worker.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{InspectError, Result};
use crate::host::HostConstants;
use crate::process::{
    count_fds, cpu_percent_between, parse_io, parse_statm, read_cpu_sample, socket_inodes,
    ConnectionIndex, CpuTimeSample, IoStatus, MemoryUsage, SocketClassification, StatRecord,
};

/// Default `/proc` mount point.
pub const DEFAULT_PROC_ROOT: &str = "/proc";
/// Pause between the two CPU samples.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);
/// Default sampling-window hint in seconds.
pub const DEFAULT_WINDOW_SECONDS: f64 = 0.3;

/// Construction parameters for [`ProcessInspector`].
#[derive(Debug, Clone)]
pub struct InspectorOptions {
    /// Target process; the calling process when `None`.
    pub pid: Option<u32>,
    /// Sampling-window hint in seconds. Carried for callers; the CPU query
    /// is driven by `sample_interval`.
    pub window: f64,
    /// Sleep between the two CPU samples.
    pub sample_interval: Duration,
    /// Root of the proc filesystem.
    pub proc_root: PathBuf,
}

impl Default for InspectorOptions {
    fn default() -> Self {
        Self {
            pid: None,
            window: DEFAULT_WINDOW_SECONDS,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
        }
    }
}

impl InspectorOptions {
    pub fn for_pid(pid: u32) -> Self {
        Self {
            pid: Some(pid),
            ..Self::default()
        }
    }
}

/// Reads resource usage of one process from `/proc`.
#[derive(Debug, Clone)]
pub struct ProcessInspector {
    pid: u32,
    host: HostConstants,
    window: f64,
    sample_interval: Duration,
    proc_root: PathBuf,
}

impl ProcessInspector {
    /// Creates an inspector, querying host constants from the OS.
    ///
    /// No record is read here; a PID that does not exist only fails once
    /// it is queried.
    pub fn new(options: InspectorOptions) -> Result<Self> {
        let host = HostConstants::query()?;
        Ok(Self::with_host(options, host))
    }

    /// Creates an inspector with explicitly supplied host constants.
    pub fn with_host(options: InspectorOptions, host: HostConstants) -> Self {
        let pid = options.pid.unwrap_or_else(std::process::id);
        debug!(
            "Inspector for pid {} (clock_ticks={}, page_size={}, proc_root={})",
            pid,
            host.clock_ticks,
            host.page_size,
            options.proc_root.display()
        );
        Self {
            pid,
            host,
            window: options.window,
            sample_interval: options.sample_interval,
            proc_root: options.proc_root,
        }
    }

    /// Inspector for the calling process with default settings.
    pub fn for_current_process() -> Result<Self> {
        Self::new(InspectorOptions::default())
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn host(&self) -> HostConstants {
        self.host
    }

    pub fn window(&self) -> f64 {
        self.window
    }

    pub fn sample_interval(&self) -> Duration {
        self.sample_interval
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    fn pid_path(&self, record: &str) -> PathBuf {
        self.proc_root.join(self.pid.to_string()).join(record)
    }

    fn read_record(&self, record: &str) -> Result<(PathBuf, String)> {
        let path = self.pid_path(record);
        match fs::read_to_string(&path) {
            Ok(content) => Ok((path, content)),
            Err(e) => Err(InspectError::read(path, e)),
        }
    }

    /// Memory footprint from `statm`, converted to bytes.
    pub fn memory_usage(&self) -> Result<MemoryUsage> {
        let (path, content) = self.read_record("statm")?;
        let usage = parse_statm(&content, self.host.page_size, &path)?;
        if !usage.is_consistent() {
            warn!(
                "pid {}: resident ({}) exceeds total ({}) in {}",
                self.pid,
                usage.resident,
                usage.total,
                path.display()
            );
        }
        Ok(usage)
    }

    /// One raw CPU time sample.
    pub fn cpu_sample(&self) -> Result<CpuTimeSample> {
        read_cpu_sample(&self.pid_path("stat"))
    }

    /// CPU usage over the sampling interval, in percent of one core.
    ///
    /// Blocks the calling thread for the whole interval. Fails if the
    /// process disappears between the two samples, and with
    /// [`InspectError::NoElapsedTime`] if the samples share a timestamp.
    pub fn cpu_usage_percent(&self) -> Result<f64> {
        let first = self.cpu_sample()?;
        thread::sleep(self.sample_interval);
        let second = self.cpu_sample()?;

        cpu_percent_between(&first, &second, self.host.clock_ticks)
            .ok_or(InspectError::NoElapsedTime)
    }

    /// I/O counters, or [`IoStatus::Unavailable`] when the record cannot be
    /// opened. A record that opens but does not parse is still an error.
    pub fn io_counters(&self) -> Result<IoStatus> {
        let path = self.pid_path("io");
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                debug!("{} unavailable: {}", path.display(), e);
                return Ok(IoStatus::Unavailable {
                    reason: unavailable_reason(&e),
                });
            }
        };
        Ok(IoStatus::Available {
            counters: parse_io(&content, &path)?,
        })
    }

    /// Number of open file descriptors.
    pub fn open_fd_count(&self) -> Result<usize> {
        count_fds(&self.pid_path("fd"))
    }

    /// Number of threads, from the `num_threads` field of `stat`.
    pub fn thread_count(&self) -> Result<u64> {
        let (path, content) = self.read_record("stat")?;
        StatRecord::parse(&content, &path)?.thread_count()
    }

    /// Counts the process's socket descriptors per protocol family.
    ///
    /// The connection tables are read fresh on every call.
    pub fn socket_classification(&self) -> Result<SocketClassification> {
        let inodes = socket_inodes(&self.pid_path("fd"))?;
        let index = ConnectionIndex::load(&self.proc_root.join("net"))?;
        let counts = index.classify_all(inodes.iter().copied());

        let unmatched = (inodes.len() as u64).saturating_sub(counts.total());
        if unmatched > 0 {
            debug!(
                "pid {}: {} socket descriptors not found in any connection table",
                self.pid, unmatched
            );
        }
        Ok(counts)
    }
}

fn unavailable_reason(e: &io::Error) -> String {
    match e.kind() {
        io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        io::ErrorKind::NotFound => "record not present".to_string(),
        _ => e.to_string(),
    }
}
