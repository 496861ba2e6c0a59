//! Port allocation for `auto_port()` placeholders.
//!
//! Allocation state lives in a [`PortLedger`]: the snapshot of host ports
//! taken once at the start of a run plus every port the run has claimed so
//! far. The [`PortAllocator`] itself only carries the policy (range, random
//! source, live probe), so one ledger can be threaded through every template
//! rendered in a run and no two placeholders ever receive the same port.

use std::collections::{BTreeSet, HashSet};

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::error::{Error, Result};
use crate::{Port, PortRange};

use super::registry::{PortSource, SystemPortSource};

/// Number of random draws before falling back to a sweep of the range.
pub const MAX_RANDOM_ATTEMPTS: usize = 100;

/// Ports that must not be handed out during the current run.
///
/// # Examples
///
/// ```
/// use sprout::port::allocator::PortLedger;
/// use sprout::Port;
///
/// let used = Port::try_from(5432).unwrap();
/// let mut ledger = PortLedger::new([used]);
/// assert!(ledger.is_taken(used));
///
/// let fresh = Port::try_from(5433).unwrap();
/// assert!(ledger.claim(fresh));
/// assert!(!ledger.claim(fresh));
/// assert_eq!(ledger.claimed().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortLedger {
    used: HashSet<Port>,
    claimed: BTreeSet<Port>,
}

impl PortLedger {
    /// Creates a ledger from a snapshot of ports in use on the host.
    #[must_use]
    pub fn new(used: impl IntoIterator<Item = Port>) -> Self {
        Self {
            used: used.into_iter().collect(),
            claimed: BTreeSet::new(),
        }
    }

    /// Takes the snapshot from a port source.
    #[must_use]
    pub fn from_source(source: &dyn PortSource) -> Self {
        Self::new(source.used_ports())
    }

    /// Returns `true` if the port is in the snapshot or already claimed.
    #[must_use]
    pub fn is_taken(&self, port: Port) -> bool {
        self.used.contains(&port) || self.claimed.contains(&port)
    }

    /// Records a claim. Returns `false` if the port was already claimed.
    pub fn claim(&mut self, port: Port) -> bool {
        self.claimed.insert(port)
    }

    /// Ports claimed so far, in ascending order.
    #[must_use]
    pub fn claimed(&self) -> &BTreeSet<Port> {
        &self.claimed
    }

    /// The host snapshot this ledger was created with.
    #[must_use]
    pub fn used(&self) -> &HashSet<Port> {
        &self.used
    }
}

/// Picks free ports from a range.
///
/// Candidates are drawn at random, which keeps workspaces created at
/// different times (each with its own snapshot) unlikely to collide. After
/// [`MAX_RANDOM_ATTEMPTS`] rejected draws the allocator sweeps the whole
/// range from a random offset, so it reports exhaustion only when no valid
/// port is left.
///
/// A candidate is valid when it is not in the ledger's snapshot, not
/// claimed earlier in the run, and not reported busy by the live probe of
/// the port source.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use sprout::port::allocator::{PortAllocator, PortLedger};
/// use sprout::port::registry::FixedPortSource;
/// use sprout::PortRange;
///
/// let mut allocator = PortAllocator::with_rng(
///     FixedPortSource::empty(),
///     PortRange::unprivileged(),
///     StdRng::seed_from_u64(7),
/// );
/// let mut ledger = PortLedger::default();
///
/// let a = allocator.allocate(&mut ledger).unwrap();
/// let b = allocator.allocate(&mut ledger).unwrap();
/// assert_ne!(a, b);
/// assert!(a.value() >= 1024);
/// ```
#[derive(Debug, Clone)]
pub struct PortAllocator<S: PortSource = SystemPortSource, R: Rng = ThreadRng> {
    source: S,
    range: PortRange,
    rng: R,
}

impl<S: PortSource> PortAllocator<S, ThreadRng> {
    /// Creates an allocator using the thread-local random generator.
    #[must_use]
    pub fn new(source: S, range: PortRange) -> Self {
        Self::with_rng(source, range, rand::rng())
    }
}

impl<S: PortSource, R: Rng> PortAllocator<S, R> {
    /// Creates an allocator with an explicit random generator.
    #[must_use]
    pub fn with_rng(source: S, range: PortRange, rng: R) -> Self {
        Self { source, range, rng }
    }

    /// The range ports are drawn from.
    #[must_use]
    pub fn range(&self) -> &PortRange {
        &self.range
    }

    /// The port source used for live probing.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Picks a free port and records it in `ledger`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PortExhausted`] if every port in the range is taken.
    pub fn allocate(&mut self, ledger: &mut PortLedger) -> Result<Port> {
        let len = u32::from(self.range.len());

        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let candidate = self.range.nth_wrapping(self.rng.random_range(0..len));
            if self.accepts(candidate, ledger) {
                return Ok(self.claim(candidate, ledger));
            }
        }

        let start = self.rng.random_range(0..len);
        log::debug!(
            "random draws exhausted, sweeping {} from offset {start}",
            self.range
        );
        for offset in 0..len {
            let candidate = self.range.nth_wrapping(start + offset);
            if self.accepts(candidate, ledger) {
                return Ok(self.claim(candidate, ledger));
            }
        }

        Err(Error::PortExhausted {
            range: self.range,
            claimed: ledger.claimed().len(),
        })
    }

    fn accepts(&self, candidate: Port, ledger: &PortLedger) -> bool {
        !ledger.is_taken(candidate) && !self.source.is_occupied(candidate)
    }

    fn claim(&self, port: Port, ledger: &mut PortLedger) -> Port {
        ledger.claim(port);
        log::debug!("claimed port {port}");
        port
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::registry::FixedPortSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn port(value: u16) -> Port {
        Port::try_from(value).unwrap()
    }

    fn range(min: u16, max: u16) -> PortRange {
        PortRange::new(port(min), port(max)).unwrap()
    }

    fn allocator(source: FixedPortSource, range: PortRange) -> PortAllocator<FixedPortSource, StdRng> {
        PortAllocator::with_rng(source, range, StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_allocate_within_range() {
        let mut alloc = allocator(FixedPortSource::empty(), range(5000, 5010));
        let mut ledger = PortLedger::default();

        let p = alloc.allocate(&mut ledger).unwrap();
        assert!(range(5000, 5010).contains(p));
        assert!(ledger.claimed().contains(&p));
    }

    #[test]
    fn test_allocate_skips_snapshot_ports() {
        let mut alloc = allocator(FixedPortSource::empty(), range(5000, 5002));
        let mut ledger = PortLedger::new([port(5000), port(5002)]);

        assert_eq!(alloc.allocate(&mut ledger).unwrap(), port(5001));
    }

    #[test]
    fn test_allocate_skips_live_occupied_ports() {
        let source = FixedPortSource::new([port(6000), port(6001)]);
        let mut alloc = allocator(source, range(6000, 6002));
        let mut ledger = PortLedger::default();

        assert_eq!(alloc.allocate(&mut ledger).unwrap(), port(6002));
    }

    #[test]
    fn test_allocate_exhausts_whole_range_then_fails() {
        let mut alloc = allocator(FixedPortSource::empty(), range(7000, 7004));
        let mut ledger = PortLedger::default();

        let mut seen = BTreeSet::new();
        for _ in 0..5 {
            assert!(seen.insert(alloc.allocate(&mut ledger).unwrap()));
        }
        assert_eq!(seen.len(), 5);

        let err = alloc.allocate(&mut ledger).unwrap_err();
        assert!(matches!(err, Error::PortExhausted { claimed: 5, .. }));
    }

    #[test]
    fn test_single_port_range() {
        let mut alloc = allocator(FixedPortSource::empty(), range(65535, 65535));
        let mut ledger = PortLedger::default();

        assert_eq!(alloc.allocate(&mut ledger).unwrap(), port(65535));
        assert!(alloc.allocate(&mut ledger).is_err());
    }

    #[test]
    fn test_fully_used_range_fails_immediately() {
        let mut alloc = allocator(FixedPortSource::empty(), range(8000, 8001));
        let mut ledger = PortLedger::new([port(8000), port(8001)]);

        let err = alloc.allocate(&mut ledger).unwrap_err();
        assert!(matches!(err, Error::PortExhausted { claimed: 0, .. }));
        assert!(ledger.claimed().is_empty());
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let mut first = allocator(FixedPortSource::empty(), PortRange::unprivileged());
        let mut second = allocator(FixedPortSource::empty(), PortRange::unprivileged());

        let a = first.allocate(&mut PortLedger::default()).unwrap();
        let b = second.allocate(&mut PortLedger::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ledger_from_source() {
        let source = FixedPortSource::new([port(3000)]);
        let ledger = PortLedger::from_source(&source);
        assert!(ledger.is_taken(port(3000)));
        assert_eq!(ledger.used().len(), 1);
        assert!(ledger.claimed().is_empty());
    }
}
