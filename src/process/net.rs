//! Socket classification against the kernel connection tables.
//!
//! `/proc/net/{tcp,tcp6,udp,udp6,unix}` list every socket the network
//! namespace knows about, one row per socket, each carrying the socket's
//! inode. A process's descriptor that links to `socket:[<inode>]` belongs
//! to whichever table lists that inode.
//!
//! The tables are host-global and change constantly, so the index is
//! rebuilt for every query and never cached.

use ahash::AHashSet;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{InspectError, Result};

/// Inode column in `/proc/net/{tcp,tcp6,udp,udp6}` rows.
pub const INET_INODE_FIELD: usize = 9;
/// Inode column in `/proc/net/unix` rows.
pub const UNIX_INODE_FIELD: usize = 6;

/// Protocol families tracked by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SocketFamily {
    Tcp,
    Tcp6,
    Udp,
    Udp6,
    Unix,
}

impl SocketFamily {
    /// Every family, in the order membership is tested.
    ///
    /// An inode listed in two tables (a snapshot caught mid-update) is
    /// attributed to the first family here. This can misfile such a socket
    /// but never counts it twice.
    pub const ALL: [SocketFamily; 5] = [
        SocketFamily::Tcp,
        SocketFamily::Tcp6,
        SocketFamily::Udp,
        SocketFamily::Udp6,
        SocketFamily::Unix,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SocketFamily::Tcp => "tcp",
            SocketFamily::Tcp6 => "tcp6",
            SocketFamily::Udp => "udp",
            SocketFamily::Udp6 => "udp6",
            SocketFamily::Unix => "unix",
        }
    }

    /// File name of the family's table under `/proc/net`.
    pub fn table_name(self) -> &'static str {
        self.label()
    }

    pub fn inode_field(self) -> usize {
        match self {
            SocketFamily::Unix => UNIX_INODE_FIELD,
            _ => INET_INODE_FIELD,
        }
    }

    /// IPv6 tables are absent on kernels built without IPv6.
    pub fn is_optional(self) -> bool {
        matches!(self, SocketFamily::Tcp6 | SocketFamily::Udp6)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Socket inodes per family, built from one read of the connection tables.
#[derive(Debug, Default, Clone)]
pub struct ConnectionIndex {
    inodes: [AHashSet<u64>; 5],
}

impl ConnectionIndex {
    /// Reads every table under `net_dir`.
    ///
    /// The tcp, udp and unix tables are required. A missing or unreadable
    /// IPv6 table leaves that family empty.
    pub fn load(net_dir: &Path) -> Result<Self> {
        let mut index = Self::default();

        for family in SocketFamily::ALL {
            let path = net_dir.join(family.table_name());
            match fs::read_to_string(&path) {
                Ok(content) => index.insert_table(family, &content, &path)?,
                Err(e) if family.is_optional() => {
                    debug!("{} unavailable, counting no {} sockets: {}", path.display(), family.label(), e);
                }
                Err(e) => return Err(InspectError::read(path, e)),
            }
        }

        Ok(index)
    }

    /// Adds every row of one table. The first line is the column header.
    pub fn insert_table(&mut self, family: SocketFamily, content: &str, path: &Path) -> Result<()> {
        let set = &mut self.inodes[family.slot()];
        let field = family.inode_field();

        for (lineno, line) in content.lines().enumerate().skip(1) {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            let raw = fields.get(field).ok_or_else(|| {
                InspectError::malformed(
                    path,
                    format!(
                        "line {}: expected inode at field {}, row has {} fields",
                        lineno + 1,
                        field,
                        fields.len()
                    ),
                )
            })?;
            let inode: u64 = raw.parse().map_err(|_| {
                InspectError::malformed(
                    path,
                    format!("line {}: inode is not an integer: {:?}", lineno + 1, raw),
                )
            })?;
            set.insert(inode);
        }

        Ok(())
    }

    pub fn inodes(&self, family: SocketFamily) -> &AHashSet<u64> {
        &self.inodes[family.slot()]
    }

    /// First family whose table lists `inode`.
    pub fn classify(&self, inode: u64) -> Option<SocketFamily> {
        SocketFamily::ALL
            .into_iter()
            .find(|family| self.inodes[family.slot()].contains(&inode))
    }

    /// Counts `inodes` per family. Inodes found in no table (raw, netlink,
    /// packet sockets, ...) are not counted.
    pub fn classify_all(&self, inodes: impl IntoIterator<Item = u64>) -> SocketClassification {
        let mut counts = SocketClassification::default();
        for inode in inodes {
            if let Some(family) = self.classify(inode) {
                counts.increment(family);
            }
        }
        counts
    }
}

/// Number of a process's descriptors per socket family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SocketClassification {
    pub tcp: u64,
    pub tcp6: u64,
    pub udp: u64,
    pub udp6: u64,
    pub unix: u64,
}

impl SocketClassification {
    pub fn get(&self, family: SocketFamily) -> u64 {
        match family {
            SocketFamily::Tcp => self.tcp,
            SocketFamily::Tcp6 => self.tcp6,
            SocketFamily::Udp => self.udp,
            SocketFamily::Udp6 => self.udp6,
            SocketFamily::Unix => self.unix,
        }
    }

    pub fn increment(&mut self, family: SocketFamily) {
        let slot = match family {
            SocketFamily::Tcp => &mut self.tcp,
            SocketFamily::Tcp6 => &mut self.tcp6,
            SocketFamily::Udp => &mut self.udp,
            SocketFamily::Udp6 => &mut self.udp6,
            SocketFamily::Unix => &mut self.unix,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u64 {
        SocketFamily::ALL.iter().map(|f| self.get(*f)).sum()
    }
}
