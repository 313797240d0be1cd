//! Prometheus metrics definitions for herakles-proc-inspector.
//!
//! Every process gauge carries a constant `pid` label so scrapes from
//! several inspectors can be told apart. Per-process gauges are vectors,
//! even the unlabelled ones, so a failed snapshot can drop every series.

use herakles_proc_inspector::{ProcessSnapshot, SocketFamily};
use prometheus::{Gauge, GaugeVec, Opts, Registry};

/// Collection of Prometheus metrics for the inspected process.
#[derive(Clone)]
pub struct ProcessMetrics {
    // ========== Process Metrics ==========
    pub memory_bytes: GaugeVec, // labels: kind
    pub cpu_usage_percent: GaugeVec,
    pub io: GaugeVec, // labels: counter
    pub io_available: GaugeVec,
    pub open_fds: GaugeVec,
    pub threads: GaugeVec,
    pub sockets: GaugeVec, // labels: family

    // ========== Exporter Metrics ==========
    pub snapshot_duration_seconds: Gauge,
    pub snapshot_success: Gauge,
}

/// The single series of a vector without variable labels.
fn single(vec: &GaugeVec) -> Gauge {
    vec.with_label_values::<&str>(&[])
}

impl ProcessMetrics {
    /// Creates and registers all Prometheus metrics with the registry.
    pub fn new(registry: &Registry, pid: u32) -> Result<Self, prometheus::Error> {
        let pid = pid.to_string();
        let opts = |name: &str, help: &str| Opts::new(name, help).const_label("pid", pid.as_str());

        let memory_bytes = GaugeVec::new(
            opts(
                "herakles_proc_memory_bytes",
                "Process memory in bytes by kind (total, resident, shared)",
            ),
            &["kind"],
        )?;
        let cpu_usage_percent = GaugeVec::new(
            opts(
                "herakles_proc_cpu_usage_percent",
                "Process CPU usage over the sampling interval, percent of one core",
            ),
            &[],
        )?;
        // Kernel counters are sampled, not incremented here, hence a gauge
        let io = GaugeVec::new(
            opts(
                "herakles_proc_io",
                "Cumulative I/O accounting values from /proc/<pid>/io",
            ),
            &["counter"],
        )?;
        let io_available = GaugeVec::new(
            opts(
                "herakles_proc_io_available",
                "Whether /proc/<pid>/io could be read (1) or not (0)",
            ),
            &[],
        )?;
        let open_fds = GaugeVec::new(
            opts("herakles_proc_open_fds", "Number of open file descriptors"),
            &[],
        )?;
        let threads = GaugeVec::new(opts("herakles_proc_threads", "Number of threads"), &[])?;
        let sockets = GaugeVec::new(
            opts(
                "herakles_proc_sockets",
                "Socket descriptors by protocol family",
            ),
            &["family"],
        )?;

        let snapshot_duration_seconds = Gauge::with_opts(opts(
            "herakles_exporter_snapshot_duration_seconds",
            "Time spent collecting the last snapshot, including the CPU sampling pause",
        ))?;
        let snapshot_success = Gauge::with_opts(opts(
            "herakles_exporter_snapshot_success",
            "Whether the last snapshot succeeded (1) or failed (0)",
        ))?;

        registry.register(Box::new(memory_bytes.clone()))?;
        registry.register(Box::new(cpu_usage_percent.clone()))?;
        registry.register(Box::new(io.clone()))?;
        registry.register(Box::new(io_available.clone()))?;
        registry.register(Box::new(open_fds.clone()))?;
        registry.register(Box::new(threads.clone()))?;
        registry.register(Box::new(sockets.clone()))?;
        registry.register(Box::new(snapshot_duration_seconds.clone()))?;
        registry.register(Box::new(snapshot_success.clone()))?;

        Ok(Self {
            memory_bytes,
            cpu_usage_percent,
            io,
            io_available,
            open_fds,
            threads,
            sockets,
            snapshot_duration_seconds,
            snapshot_success,
        })
    }

    /// Copies a snapshot into the gauges.
    pub fn observe(&self, snap: &ProcessSnapshot) {
        self.memory_bytes
            .with_label_values(&["total"])
            .set(snap.memory.total as f64);
        self.memory_bytes
            .with_label_values(&["resident"])
            .set(snap.memory.resident as f64);
        self.memory_bytes
            .with_label_values(&["shared"])
            .set(snap.memory.shared as f64);

        match snap.cpu_percent {
            Some(pct) => single(&self.cpu_usage_percent).set(pct),
            None => self.cpu_usage_percent.reset(),
        }

        match snap.io.counters() {
            Some(counters) => {
                single(&self.io_available).set(1.0);
                for (label, value) in counters.iter() {
                    self.io.with_label_values(&[label]).set(value as f64);
                }
            }
            None => {
                single(&self.io_available).set(0.0);
                self.io.reset();
            }
        }

        single(&self.open_fds).set(snap.open_fds as f64);
        single(&self.threads).set(snap.threads as f64);

        for family in SocketFamily::ALL {
            self.sockets
                .with_label_values(&[family.label()])
                .set(snap.sockets.get(family) as f64);
        }
    }

    /// Drops every per-process series. Exporter gauges are kept.
    pub fn clear(&self) {
        self.memory_bytes.reset();
        self.cpu_usage_percent.reset();
        self.io.reset();
        self.io_available.reset();
        self.open_fds.reset();
        self.threads.reset();
        self.sockets.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use herakles_proc_inspector::{IoCounters, IoStatus, MemoryUsage, SocketClassification};
    use prometheus::{Encoder, TextEncoder};

    fn snapshot(io: IoStatus) -> ProcessSnapshot {
        ProcessSnapshot {
            pid: 1104,
            collected_at: Utc::now(),
            memory: MemoryUsage {
                total: 8192,
                resident: 4096,
                shared: 0,
            },
            cpu_percent: Some(12.5),
            io,
            open_fds: 9,
            threads: 3,
            sockets: SocketClassification {
                tcp: 2,
                unix: 1,
                ..SocketClassification::default()
            },
        }
    }

    fn render(registry: &Registry) -> String {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&registry.gather(), &mut buf)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_observe_exports_all_families() {
        let registry = Registry::new();
        let metrics = ProcessMetrics::new(&registry, 1104).unwrap();

        let mut counters = IoCounters::default();
        counters.add("rchar", 100);
        metrics.observe(&snapshot(IoStatus::Available { counters }));

        let text = render(&registry);
        assert!(text.contains(r#"herakles_proc_sockets{family="tcp",pid="1104"} 2"#));
        assert!(text.contains(r#"herakles_proc_sockets{family="udp6",pid="1104"} 0"#));
        assert!(text.contains(r#"herakles_proc_memory_bytes{kind="resident",pid="1104"} 4096"#));
        assert!(text.contains(r#"herakles_proc_io{counter="rchar",pid="1104"} 100"#));
        assert!(text.contains(r#"herakles_proc_io_available{pid="1104"} 1"#));
        assert!(text.contains(r#"herakles_proc_threads{pid="1104"} 3"#));
    }

    #[test]
    fn test_observe_unavailable_io() {
        let registry = Registry::new();
        let metrics = ProcessMetrics::new(&registry, 1).unwrap();
        metrics.observe(&snapshot(IoStatus::Unavailable {
            reason: "permission denied".into(),
        }));

        let text = render(&registry);
        assert!(text.contains(r#"herakles_proc_io_available{pid="1"} 0"#));
        assert!(!text.contains("herakles_proc_io{"));
    }

    #[test]
    fn test_clear_drops_process_series() {
        let registry = Registry::new();
        let metrics = ProcessMetrics::new(&registry, 77).unwrap();
        metrics.observe(&snapshot(IoStatus::Unavailable {
            reason: "permission denied".into(),
        }));
        metrics.snapshot_success.set(0.0);
        metrics.clear();

        let text = render(&registry);
        assert!(!text.contains("herakles_proc_"));
        assert!(text.contains(r#"herakles_exporter_snapshot_success{pid="77"} 0"#));
    }

    #[test]
    fn test_missing_cpu_rate_drops_cpu_series() {
        let registry = Registry::new();
        let metrics = ProcessMetrics::new(&registry, 5).unwrap();
        let mut snap = snapshot(IoStatus::Unavailable {
            reason: "permission denied".into(),
        });
        metrics.observe(&snap);
        assert!(render(&registry).contains(r#"herakles_proc_cpu_usage_percent{pid="5"} 12.5"#));

        snap.cpu_percent = None;
        metrics.observe(&snap);
        let text = render(&registry);
        assert!(!text.contains("herakles_proc_cpu_usage_percent{"));
        assert!(text.contains(r#"herakles_proc_threads{pid="5"} 3"#));
    }
}
