//! Check command implementation.
//!
//! Runs every query once against the configured target and reports which
//! records are usable.

use herakles_proc_inspector::{HostConstants, IoStatus, ProcessInspector};

use crate::config::{validate_effective_config, Config};

/// Validates host constants, the target's records and the configuration.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Herakles Process Inspector - System Check");
    println!("=============================================");

    let mut all_ok = true;

    println!("\n🖥️  Checking host constants...");
    match HostConstants::query() {
        Ok(host) => println!(
            "   ✅ clock ticks: {} Hz, page size: {} bytes",
            host.clock_ticks, host.page_size
        ),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => println!("   ✅ Configuration is valid"),
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    let inspector = ProcessInspector::new(config.inspector_options())?;
    println!(
        "\n📁 Checking records of pid {} under {}...",
        inspector.pid(),
        inspector.proc_root().display()
    );

    let mut report = |name: &str, result: Result<String, String>, required: bool| match result {
        Ok(detail) => println!("   ✅ {}: {}", name, detail),
        Err(e) if required => {
            println!("   ❌ {}: {}", name, e);
            all_ok = false;
        }
        Err(e) => println!("   ⚠️  {}: {}", name, e),
    };

    report(
        "statm",
        inspector
            .memory_usage()
            .map(|m| format!("resident {} MB", m.resident / 1024 / 1024))
            .map_err(|e| e.to_string()),
        true,
    );
    report(
        "stat",
        inspector
            .thread_count()
            .map(|t| format!("{} threads", t))
            .map_err(|e| e.to_string()),
        true,
    );
    report(
        "fd",
        inspector
            .open_fd_count()
            .map(|n| format!("{} open descriptors", n))
            .map_err(|e| e.to_string()),
        true,
    );
    report(
        "io",
        match inspector.io_counters() {
            Ok(IoStatus::Available { counters }) => Ok(format!("{} counters", counters.len())),
            Ok(IoStatus::Unavailable { reason }) => Err(format!("unavailable ({})", reason)),
            Err(e) => Err(e.to_string()),
        },
        false,
    );
    report(
        "net",
        inspector
            .socket_classification()
            .map(|s| format!("{} classified sockets", s.total()))
            .map_err(|e| e.to_string()),
        true,
    );

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - target is observable");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review the output above");
        std::process::exit(1);
    }
}
