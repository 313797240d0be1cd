//! Integration tests for the process inspector.
//!
//! Each test builds a fake proc tree in a temporary directory and points
//! the inspector at it, so results are deterministic.

mod common;

use common::{inet_row, stat_line, unix_row, FakeProc, FAKE_PID, TCP_HEADER, UNIX_HEADER};
use herakles_proc_inspector::{
    InspectError, InspectorOptions, IoStatus, ProcessInspector, SocketClassification,
    SocketFamily,
};
use std::thread;
use std::time::Duration;

// ---- Tests for socket classification ----

#[test]
fn test_single_tcp_socket_is_classified() {
    let proc = FakeProc::new();
    proc.write_table("tcp", TCP_HEADER, &[inet_row(0, 12345)]);
    proc.add_fd(3, "socket:[12345]");

    let sockets = proc.inspector().socket_classification().unwrap();
    assert_eq!(
        sockets,
        SocketClassification {
            tcp: 1,
            ..SocketClassification::default()
        }
    );
}

#[test]
fn test_every_family_is_counted() {
    let proc = FakeProc::new();
    proc.write_table("tcp", TCP_HEADER, &[inet_row(0, 100), inet_row(1, 101)]);
    proc.write_table("tcp6", TCP_HEADER, &[inet_row(0, 200)]);
    proc.write_table("udp", TCP_HEADER, &[inet_row(0, 300)]);
    proc.write_table("udp6", TCP_HEADER, &[inet_row(0, 400)]);
    proc.write_table("unix", UNIX_HEADER, &[unix_row(500), unix_row(501)]);

    for (fd, inode) in [100, 101, 200, 300, 400, 500, 501].iter().enumerate() {
        proc.add_fd(fd as u32 + 3, &format!("socket:[{}]", inode));
    }

    let sockets = proc.inspector().socket_classification().unwrap();
    assert_eq!(sockets.tcp, 2);
    assert_eq!(sockets.tcp6, 1);
    assert_eq!(sockets.udp, 1);
    assert_eq!(sockets.udp6, 1);
    assert_eq!(sockets.unix, 2);
    assert_eq!(sockets.total(), 7);
}

#[test]
fn test_missing_ipv6_tables_count_zero() {
    let proc = FakeProc::new();
    proc.write_table("udp", TCP_HEADER, &[inet_row(0, 777)]);
    proc.add_fd(3, "socket:[777]");

    let sockets = proc.inspector().socket_classification().unwrap();
    assert_eq!(sockets.udp, 1);
    assert_eq!(sockets.get(SocketFamily::Tcp6), 0);
    assert_eq!(sockets.get(SocketFamily::Udp6), 0);
}

#[test]
fn test_unreadable_ipv6_tables_count_zero() {
    let proc = FakeProc::new();
    // A directory in place of the table fails to read, whoever runs the test
    std::fs::create_dir(proc.net_dir().join("tcp6")).unwrap();
    std::fs::create_dir(proc.net_dir().join("udp6")).unwrap();
    proc.write_table("tcp", TCP_HEADER, &[inet_row(0, 11)]);
    proc.write_table("udp", TCP_HEADER, &[inet_row(0, 22)]);
    proc.write_table("unix", UNIX_HEADER, &[unix_row(33)]);
    proc.add_fd(3, "socket:[11]");
    proc.add_fd(4, "socket:[22]");
    proc.add_fd(5, "socket:[33]");

    let sockets = proc.inspector().socket_classification().unwrap();
    assert_eq!(
        sockets,
        SocketClassification {
            tcp: 1,
            udp: 1,
            unix: 1,
            ..SocketClassification::default()
        }
    );
}

#[test]
fn test_non_socket_descriptors_are_skipped() {
    let proc = FakeProc::new();
    proc.write_table("tcp", TCP_HEADER, &[inet_row(0, 12345)]);
    proc.add_fd(0, "/dev/null");
    proc.add_fd(1, "pipe:[999]");
    proc.add_fd(2, "anon_inode:[eventfd]");
    proc.add_fd(3, "socket:[12345]");

    let inspector = proc.inspector();
    assert_eq!(inspector.open_fd_count().unwrap(), 4);
    assert_eq!(inspector.socket_classification().unwrap().total(), 1);
}

#[test]
fn test_unknown_socket_inode_is_not_counted() {
    let proc = FakeProc::new();
    proc.add_fd(3, "socket:[4242]");

    let sockets = proc.inspector().socket_classification().unwrap();
    assert_eq!(sockets, SocketClassification::default());
}

#[test]
fn test_inode_in_two_tables_counts_once() {
    let proc = FakeProc::new();
    proc.write_table("tcp", TCP_HEADER, &[inet_row(0, 55)]);
    proc.write_table("unix", UNIX_HEADER, &[unix_row(55)]);
    proc.add_fd(3, "socket:[55]");

    let sockets = proc.inspector().socket_classification().unwrap();
    assert_eq!(sockets.tcp, 1);
    assert_eq!(sockets.unix, 0);
}

#[test]
fn test_missing_required_table_is_an_error() {
    let proc = FakeProc::new();
    std::fs::remove_file(proc.net_dir().join("unix")).unwrap();

    assert!(proc.inspector().socket_classification().is_err());
}

#[test]
fn test_malformed_table_row_is_an_error() {
    let proc = FakeProc::new();
    proc.write_table("tcp", TCP_HEADER, &["0: 0100007F:1F90".to_string()]);

    let err = proc.inspector().socket_classification().unwrap_err();
    assert!(matches!(err, InspectError::Malformed { .. }));
}

// ---- Tests for I/O counters ----

#[test]
fn test_io_counters_are_read() {
    let proc = FakeProc::new();
    proc.write_record(
        "io",
        "rchar: 2048\nwchar: 1024\nsyscr: 10\nsyscw: 5\nread_bytes: 4096\nwrite_bytes: 0\ncancelled_write_bytes: 0\n",
    );

    let io = proc.inspector().io_counters().unwrap();
    let counters = io.counters().expect("io should be available");
    assert_eq!(counters.get("rchar"), Some(2048));
    assert_eq!(counters.get("read_bytes"), Some(4096));
    assert_eq!(counters.len(), 7);
}

#[test]
fn test_duplicate_io_labels_are_summed() {
    let proc = FakeProc::new();
    proc.write_record("io", "rchar: 10\nrchar: 5\n");

    let io = proc.inspector().io_counters().unwrap();
    assert_eq!(io.counters().and_then(|c| c.get("rchar")), Some(15));
}

#[test]
fn test_missing_io_record_is_unavailable() {
    let proc = FakeProc::new();

    match proc.inspector().io_counters().unwrap() {
        IoStatus::Unavailable { reason } => assert!(!reason.is_empty()),
        other => panic!("expected unavailable io, got {:?}", other),
    }
}

// ---- Tests for memory, threads and CPU ----

#[test]
fn test_memory_usage_in_bytes() {
    let proc = FakeProc::new();

    let memory = proc.inspector().memory_usage().unwrap();
    assert_eq!(memory.total, 2048 * 4096);
    assert_eq!(memory.resident, 512 * 4096);
    assert_eq!(memory.shared, 128 * 4096);
    assert!(memory.resident <= memory.total);
}

#[test]
fn test_thread_count_from_stat() {
    let proc = FakeProc::new();
    proc.write_stat(&stat_line(FAKE_PID, "worker (x)", 0, 0, 12));

    assert_eq!(proc.inspector().thread_count().unwrap(), 12);
}

#[test]
fn test_short_stat_record_is_an_error() {
    let proc = FakeProc::new();
    proc.write_stat("1104 (fake) S 1 2 3 4 5 6 7 8 9 10 11 12 13 14\n");

    let err = proc.inspector().thread_count().unwrap_err();
    assert!(matches!(err, InspectError::Malformed { .. }));
}

#[test]
fn test_idle_process_uses_no_cpu() {
    let proc = FakeProc::new();

    let pct = proc.inspector().cpu_usage_percent().unwrap();
    assert!(pct >= 0.0);
    assert!(pct < 1e-9);
}

// ---- Tests for process lifecycle ----

#[test]
fn test_process_exit_between_cpu_samples_is_an_error() {
    let proc = FakeProc::new();
    let inspector = proc.inspector_with_interval(Duration::from_millis(400));
    let stat = proc.pid_dir().join("stat");

    let remover = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        std::fs::remove_file(stat).unwrap();
    });

    let err = inspector.cpu_usage_percent().unwrap_err();
    remover.join().unwrap();
    assert!(err.is_not_found());
}

#[test]
fn test_vanished_process_fails_every_query() {
    let proc = FakeProc::new();
    let options = InspectorOptions {
        pid: Some(FAKE_PID + 1),
        proc_root: proc.root().to_path_buf(),
        ..InspectorOptions::default()
    };
    let inspector = ProcessInspector::new(options).unwrap();

    assert!(inspector.memory_usage().unwrap_err().is_not_found());
    assert!(inspector.thread_count().unwrap_err().is_not_found());
    assert!(inspector.open_fd_count().is_err());
    assert!(inspector.socket_classification().is_err());
    assert!(inspector.snapshot().is_err());
}

#[test]
fn test_snapshot_of_fake_process() {
    let proc = FakeProc::new();
    proc.write_table("tcp", TCP_HEADER, &[inet_row(0, 12345)]);
    proc.add_fd(3, "socket:[12345]");

    let snapshot = proc.inspector().snapshot().unwrap();
    assert_eq!(snapshot.pid, FAKE_PID);
    assert_eq!(snapshot.threads, 1);
    assert_eq!(snapshot.open_fds, 1);
    assert_eq!(snapshot.sockets.tcp, 1);
    assert!(!snapshot.io.is_available());
    assert_eq!(snapshot.cpu_percent.map(|p| p < 1e-9), Some(true));
}

#[test]
fn test_inspecting_own_process() {
    let inspector = ProcessInspector::new(InspectorOptions {
        sample_interval: Duration::from_millis(20),
        ..InspectorOptions::default()
    })
    .unwrap();
    assert_eq!(inspector.pid(), std::process::id());

    let memory = inspector.memory_usage().unwrap();
    assert!(memory.resident > 0);
    assert!(memory.resident <= memory.total);
    assert!(inspector.thread_count().unwrap() >= 1);
    assert!(inspector.open_fd_count().unwrap() >= 1);
    assert!(inspector.cpu_usage_percent().unwrap() >= 0.0);
    assert!(inspector.socket_classification().is_ok());
}
