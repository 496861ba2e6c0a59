//! Property-based tests for port types and allocation.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::allocator::{PortAllocator, PortLedger};
use super::registry::FixedPortSource;
use super::{Port, PortRange};

const MIN_VALID_PORT: u16 = Port::MIN;
const MAX_VALID_PORT: u16 = Port::MAX;

fn range(min: u16, max: u16) -> PortRange {
    PortRange::new(Port::try_from(min).unwrap(), Port::try_from(max).unwrap()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Every non-zero u16 is a valid port
    #[test]
    fn port_always_in_valid_range(port in MIN_VALID_PORT..=MAX_VALID_PORT) {
        let p = Port::try_from(port);
        prop_assert!(p.is_ok());
        prop_assert_eq!(p.unwrap().value(), port);
    }

    // contains() is accurate
    #[test]
    fn port_range_contains_accuracy(start in MIN_VALID_PORT..=MAX_VALID_PORT, len in 0u16..=100, test_port in MIN_VALID_PORT..=MAX_VALID_PORT) {
        let end = start.saturating_add(len);
        let r = range(start, end);
        let should_contain = test_port >= start && test_port <= end;
        prop_assert_eq!(r.contains(Port::try_from(test_port).unwrap()), should_contain);
    }

    // Walking offsets 0..len visits every port of the range exactly once
    #[test]
    fn nth_wrapping_covers_range(start in MIN_VALID_PORT..=MAX_VALID_PORT, len in 0u16..=50) {
        let r = range(start, start.saturating_add(len));
        let ports: HashSet<Port> = (0..u32::from(r.len())).map(|i| r.nth_wrapping(i)).collect();

        prop_assert_eq!(ports.len(), usize::from(r.len()));
        prop_assert!(ports.contains(&r.min()) && ports.contains(&r.max()));
    }

    // nth_wrapping never leaves the range
    #[test]
    fn nth_wrapping_stays_in_range(start in MIN_VALID_PORT..=MAX_VALID_PORT, len in 0u16..=1000, offset in any::<u32>()) {
        let r = range(start, start.saturating_add(len));
        prop_assert!(r.contains(r.nth_wrapping(offset)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    // Allocation hands out distinct ports that avoid the snapshot and the
    // live source, and fails exactly when the range runs out
    #[test]
    fn allocation_respects_ledger_and_source(
        snapshot in prop::collection::hash_set(10000u16..10050, 0..30),
        busy in prop::collection::hash_set(10000u16..10050, 0..10),
        requests in 1usize..60,
        seed in any::<u64>(),
    ) {
        let to_ports = |set: &HashSet<u16>| -> Vec<Port> {
            set.iter().map(|&p| Port::try_from(p).unwrap()).collect()
        };
        let mut allocator = PortAllocator::with_rng(
            FixedPortSource::new(to_ports(&busy)),
            range(10000, 10049),
            StdRng::seed_from_u64(seed),
        );
        let mut ledger = PortLedger::new(to_ports(&snapshot));
        let available = (10000u16..10050)
            .filter(|p| !snapshot.contains(p) && !busy.contains(p))
            .count();

        let mut seen = HashSet::new();
        for i in 0..requests {
            match allocator.allocate(&mut ledger) {
                Ok(port) => {
                    prop_assert!(i < available);
                    prop_assert!(seen.insert(port));
                    prop_assert!(!snapshot.contains(&port.value()));
                    prop_assert!(!busy.contains(&port.value()));
                }
                Err(_) => prop_assert!(i >= available),
            }
        }
        prop_assert_eq!(ledger.claimed().len(), requests.min(available));
    }
}
