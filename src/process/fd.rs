//! Open file descriptors from `/proc/<pid>/fd`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

use crate::error::{InspectError, Result};

/// Link target the kernel uses for socket descriptors.
static SOCKET_TARGET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^socket:\[(\d+)\]$").expect("socket target pattern is valid"));

/// Number of entries in the descriptor directory.
pub fn count_fds(fd_dir: &Path) -> Result<usize> {
    let entries = fs::read_dir(fd_dir).map_err(|e| InspectError::read(fd_dir, e))?;
    Ok(entries.flatten().count())
}

/// Socket inodes referenced by the descriptors in `fd_dir`.
///
/// Listing the directory must succeed. A descriptor that closes between
/// listing and `readlink` is skipped, as is anything that is not a socket.
/// If descriptors vanished and the directory itself is gone afterwards, the
/// process exited mid-scan and the scan fails.
pub fn socket_inodes(fd_dir: &Path) -> Result<Vec<u64>> {
    let entries = fs::read_dir(fd_dir).map_err(|e| InspectError::read(fd_dir, e))?;

    let mut inodes = Vec::new();
    let mut vanished = 0usize;
    for entry in entries.flatten() {
        let path = entry.path();
        let target = match fs::read_link(&path) {
            Ok(t) => t,
            Err(e) => {
                if e.kind() == io::ErrorKind::NotFound {
                    vanished += 1;
                }
                debug!("Skipping descriptor {}: {}", path.display(), e);
                continue;
            }
        };
        if let Some(inode) = parse_socket_inode(&target.to_string_lossy()) {
            inodes.push(inode);
        }
    }

    ensure_still_present(fd_dir, vanished)?;
    Ok(inodes)
}

fn ensure_still_present(fd_dir: &Path, vanished: usize) -> Result<()> {
    if vanished > 0 && !fd_dir.exists() {
        return Err(InspectError::read(
            fd_dir,
            io::Error::new(io::ErrorKind::NotFound, "process exited during descriptor scan"),
        ));
    }
    Ok(())
}

/// Extracts the inode from a `socket:[<inode>]` link target.
pub fn parse_socket_inode(target: &str) -> Option<u64> {
    SOCKET_TARGET
        .captures(target)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
