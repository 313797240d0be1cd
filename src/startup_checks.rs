//! Startup requirement validation for herakles-proc-inspector.
//!
//! Verifies that the target process is readable before the server starts.

use herakles_proc_inspector::{IoStatus, ProcessInspector};
use nix::unistd::geteuid;
use tracing::{error, info, warn};

/// Validate all runtime requirements
pub fn validate_requirements(inspector: &ProcessInspector) -> Result<(), ValidationError> {
    info!("🔍 Validating runtime requirements...");

    check_user_privileges(inspector.pid());
    check_stat_access(inspector)?;
    check_io_access(inspector);

    info!("✅ All runtime requirements validated");
    Ok(())
}

/// Warns when a foreign process is inspected without root.
fn check_user_privileges(pid: u32) {
    if geteuid().is_root() {
        info!("✅ Running as root (uid=0)");
    } else if pid != std::process::id() {
        warn!("⚠️  Not running as root - io and fd records of pid {} may be unreadable", pid);
        warn!("   Recommendation: run as root or as the owner of the target process");
    }
}

/// The stat record backs CPU and thread metrics; without it nothing useful is exported.
fn check_stat_access(inspector: &ProcessInspector) -> Result<(), ValidationError> {
    match inspector.thread_count() {
        Ok(threads) => {
            info!("✅ stat readable for pid {} ({} threads)", inspector.pid(), threads);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            error!("❌ Process {} does not exist", inspector.pid());
            Err(ValidationError::ProcessNotFound(inspector.pid()))
        }
        Err(e) => {
            error!("❌ Cannot read stat of pid {}: {}", inspector.pid(), e);
            Err(ValidationError::StatUnreadable(e.to_string()))
        }
    }
}

fn check_io_access(inspector: &ProcessInspector) {
    match inspector.io_counters() {
        Ok(IoStatus::Available { .. }) => info!("✅ io counters readable"),
        Ok(IoStatus::Unavailable { reason }) => {
            warn!("⚠️  io counters unavailable ({}) - I/O metrics will be skipped", reason)
        }
        Err(e) => warn!("⚠️  Could not test io access: {}", e),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Process {0} not found")]
    ProcessNotFound(u32),

    #[error("Cannot read process stat: {0}")]
    StatUnreadable(String),
}
