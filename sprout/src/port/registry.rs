//! Discovery of ports already in use on the host.
//!
//! The allocator never hands out a port that the host already has bound.
//! Port sources are trait-based so rendering can be tested against a fixed
//! set of used ports instead of the real network stack.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Port;

/// A source of information about ports in use on the host.
///
/// # Examples
///
/// ```
/// use sprout::port::registry::{FixedPortSource, PortSource};
/// use sprout::Port;
///
/// let source = FixedPortSource::new([Port::try_from(5432).unwrap()]);
/// assert!(source.used_ports().contains(&Port::try_from(5432).unwrap()));
/// ```
pub trait PortSource {
    /// Snapshot of every port currently bound on the host.
    ///
    /// Best-effort: when the host cannot be inspected the snapshot is empty
    /// rather than an error, so a missing data source never blocks
    /// workspace creation.
    fn used_ports(&self) -> HashSet<Port>;

    /// Live check for a single candidate port.
    ///
    /// Catches ports bound after the snapshot was taken. The default
    /// implementation reports every port as free.
    fn is_occupied(&self, _port: Port) -> bool {
        false
    }
}

/// Port source backed by the operating system.
///
/// On Linux the snapshot is read from `/proc/net/tcp` and `/proc/net/tcp6`,
/// covering IPv4 and IPv6 sockets on every interface. The live check tries
/// to bind the port through the `port-selector` crate.
#[derive(Debug, Clone)]
pub struct SystemPortSource {
    proc_root: PathBuf,
    probe: bool,
}

impl SystemPortSource {
    /// Creates a source reading the real `/proc` and probing by binding.
    #[must_use]
    pub fn new() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            probe: true,
        }
    }

    /// Reads socket tables below `root` instead of `/proc`.
    #[must_use]
    pub fn with_proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self
    }

    /// Enables or disables the bind probe used by [`PortSource::is_occupied`].
    #[must_use]
    pub fn with_probe(mut self, probe: bool) -> Self {
        self.probe = probe;
        self
    }

    fn read_socket_table(path: &Path, ports: &mut HashSet<Port>) -> bool {
        match fs::read_to_string(path) {
            Ok(table) => {
                ports.extend(parse_socket_table(&table));
                true
            }
            Err(e) => {
                log::debug!("cannot read socket table {}: {e}", path.display());
                false
            }
        }
    }
}

impl Default for SystemPortSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PortSource for SystemPortSource {
    fn used_ports(&self) -> HashSet<Port> {
        let mut ports = HashSet::new();
        let net = self.proc_root.join("net");
        let v4 = Self::read_socket_table(&net.join("tcp"), &mut ports);
        let v6 = Self::read_socket_table(&net.join("tcp6"), &mut ports);
        if !v4 && !v6 {
            log::debug!("no socket tables available, assuming no ports in use");
        }
        ports
    }

    fn is_occupied(&self, port: Port) -> bool {
        self.probe && !port_selector::is_free(port.value())
    }
}

/// Parses the local ports out of a `/proc/net/tcp`-style socket table.
///
/// Rows look like `0: 0100007F:1F90 00000000:0000 0A ...`; the port is the
/// hexadecimal suffix of the second column. The header row and malformed
/// rows are skipped.
///
/// # Examples
///
/// ```
/// use sprout::port::registry::parse_socket_table;
///
/// let table = "  sl  local_address rem_address   st\n   0: 0100007F:1F90 00000000:0000 0A\n";
/// let ports: Vec<u16> = parse_socket_table(table).map(|p| p.value()).collect();
/// assert_eq!(ports, vec![8080]);
/// ```
pub fn parse_socket_table(table: &str) -> impl Iterator<Item = Port> + '_ {
    table.lines().skip(1).filter_map(|line| {
        let local = line.split_whitespace().nth(1)?;
        let (_, hex_port) = local.rsplit_once(':')?;
        let value = u16::from_str_radix(hex_port, 16).ok()?;
        Port::try_from(value).ok()
    })
}

/// Port source with a fixed, in-memory set of used ports.
///
/// Used by tests and by dry runs, where touching the network stack would be
/// an observable side effect.
#[derive(Debug, Clone, Default)]
pub struct FixedPortSource {
    used: HashSet<Port>,
}

impl FixedPortSource {
    /// Creates a source reporting exactly `used` as occupied.
    #[must_use]
    pub fn new(used: impl IntoIterator<Item = Port>) -> Self {
        Self {
            used: used.into_iter().collect(),
        }
    }

    /// Creates a source where every port is free.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Marks a port as used.
    pub fn mark_used(&mut self, port: Port) {
        self.used.insert(port);
    }
}

impl PortSource for FixedPortSource {
    fn used_ports(&self) -> HashSet<Port> {
        self.used.clone()
    }

    fn is_occupied(&self, port: Port) -> bool {
        self.used.contains(&port)
    }
}
