//! Fake `/proc` trees for integration tests.

#![allow(dead_code)]

use herakles_proc_inspector::{HostConstants, InspectorOptions, ProcessInspector};
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

pub const FAKE_PID: u32 = 1104;

pub const TCP_HEADER: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode";
pub const UNIX_HEADER: &str = "Num       RefCount Protocol Flags    Type St Inode Path";

/// A `/proc` lookalike rooted in a temporary directory.
pub struct FakeProc {
    dir: TempDir,
    pid: u32,
}

impl FakeProc {
    /// Creates a tree with an idle single-threaded process and empty
    /// connection tables (IPv4 and unix only).
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let fake = Self { dir, pid: FAKE_PID };
        fs::create_dir_all(fake.pid_dir().join("fd")).unwrap();
        fs::create_dir_all(fake.net_dir()).unwrap();

        fake.write_stat(&stat_line(FAKE_PID, "fake proc", 10, 5, 1));
        fake.write_record("statm", "2048 512 128 10 0 300 0\n");
        fake.write_table("tcp", TCP_HEADER, &[]);
        fake.write_table("udp", TCP_HEADER, &[]);
        fake.write_table("unix", UNIX_HEADER, &[]);
        fake
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn pid_dir(&self) -> PathBuf {
        self.root().join(self.pid.to_string())
    }

    pub fn net_dir(&self) -> PathBuf {
        self.root().join("net")
    }

    pub fn write_record(&self, name: &str, content: &str) {
        fs::write(self.pid_dir().join(name), content).unwrap();
    }

    pub fn write_stat(&self, content: &str) {
        self.write_record("stat", content);
    }

    pub fn write_table(&self, name: &str, header: &str, rows: &[String]) {
        let mut content = format!("{}\n", header);
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        fs::write(self.net_dir().join(name), content).unwrap();
    }

    /// Adds an fd entry pointing at `target`, like the kernel's magic links.
    pub fn add_fd(&self, fd: u32, target: &str) {
        symlink(target, self.pid_dir().join("fd").join(fd.to_string())).unwrap();
    }

    pub fn inspector(&self) -> ProcessInspector {
        self.inspector_with_interval(Duration::from_millis(10))
    }

    pub fn inspector_with_interval(&self, sample_interval: Duration) -> ProcessInspector {
        let options = InspectorOptions {
            pid: Some(self.pid),
            sample_interval,
            proc_root: self.root().to_path_buf(),
            ..InspectorOptions::default()
        };
        ProcessInspector::with_host(
            options,
            HostConstants {
                clock_ticks: 100,
                page_size: 4096,
            },
        )
    }
}

/// A 52-field stat line with the given times and thread count.
pub fn stat_line(pid: u32, comm: &str, utime: u64, stime: u64, threads: u64) -> String {
    let mut fields: Vec<String> = vec![pid.to_string(), format!("({})", comm), "S".into()];
    for idx in 3..52 {
        let value = match idx {
            13 => utime,
            14 => stime,
            19 => threads,
            _ => 0,
        };
        fields.push(value.to_string());
    }
    fields.join(" ")
}

/// A tcp/udp table row carrying `inode` in the inode column.
pub fn inet_row(slot: u32, inode: u64) -> String {
    format!(
        "{:>4}: 0100007F:1F90 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 {} 1 0000000000000000 100 0 0 10 0",
        slot, inode
    )
}

/// A unix table row carrying `inode` in the inode column.
pub fn unix_row(inode: u64) -> String {
    format!(
        "0000000000000000: 00000002 00000000 00010000 0001 01 {} /run/fake.sock",
        inode
    )
}
