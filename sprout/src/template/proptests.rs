//! Property-based tests for parsing and rendering.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::port::allocator::{PortAllocator, PortLedger};
use crate::port::registry::FixedPortSource;
use crate::{Port, PortRange};

fn resolver(seed: u64, range: PortRange) -> Resolver<ScriptedPrompter, FixedPortSource, StdRng> {
    Resolver::new(
        PortAllocator::with_rng(FixedPortSource::empty(), range, StdRng::seed_from_u64(seed)),
        ScriptedPrompter::default(),
    )
}

/// Text that cannot contain a placeholder opener.
fn literal_text() -> impl Strategy<Value = String> {
    "[^{]{0,200}"
}

/// Fragments that mix placeholders, near-misses and plain text.
fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9=_ \n]{0,12}",
        "[A-Z_][A-Z0-9_]{0,6}".prop_map(|name| format!("{{{{ {name} }}}}")),
        Just("{{ auto_port() }}".to_string()),
        Just("{{".to_string()),
        Just("}}".to_string()),
        Just("${KEEP:-x}".to_string()),
        "[ a-z(|)-]{0,6}".prop_map(|inner| format!("{{{{{inner}}}}}")),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Text without placeholders renders to itself
    #[test]
    fn literal_only_renders_identically(text in literal_text()) {
        let template = parse(&text);
        prop_assert!(template.is_literal_only());

        let mut r = resolver(0, PortRange::unprivileged());
        let mut ctx = ResolutionContext::new(Environment::default());
        prop_assert_eq!(render(&template, &mut ctx, &mut r).unwrap(), text);
    }

    // Concatenating the raw segments reproduces the input
    #[test]
    fn parse_preserves_source(parts in prop::collection::vec(fragment(), 0..20)) {
        let text: String = parts.concat();
        let template = parse(&text);
        prop_assert_eq!(template.source(), text);

        // No two literals are adjacent
        let adjacent_literals = template
            .segments()
            .windows(2)
            .any(|pair| !pair[0].is_placeholder() && !pair[1].is_placeholder());
        prop_assert!(!adjacent_literals);
    }

    // Every auto_port() gets a distinct in-range port outside the snapshot
    #[test]
    fn auto_ports_are_distinct_and_free(
        count in 1usize..40,
        used in prop::collection::hash_set(40000u16..40100, 0..60),
        seed in any::<u64>(),
    ) {
        let range = PortRange::new(
            Port::try_from(40000).unwrap(),
            Port::try_from(40099).unwrap(),
        ).unwrap();
        let snapshot: HashSet<Port> = used.iter().map(|&p| Port::try_from(p).unwrap()).collect();
        let free = 100 - snapshot.len();

        let text = "P={{ auto_port() }}\n".repeat(count);
        let mut r = resolver(seed, range);
        let mut ctx = ResolutionContext::new(Environment::default())
            .with_ports(PortLedger::new(snapshot.iter().copied()));
        let result = render(&parse(&text), &mut ctx, &mut r);

        if count > free {
            prop_assert!(result.is_err());
        } else {
            let output = result.unwrap();
            let ports: Vec<u16> = output
                .lines()
                .map(|line| line.trim_start_matches("P=").parse().unwrap())
                .collect();
            let distinct: HashSet<u16> = ports.iter().copied().collect();
            prop_assert_eq!(distinct.len(), count);
            for p in ports {
                prop_assert!((40000..=40099).contains(&p));
                prop_assert!(!used.contains(&p));
            }
        }
    }

    // Environment values win in every mode
    #[test]
    fn environment_value_is_used(name in "[A-Z][A-Z0-9_]{0,10}", value in "[^\n]{0,30}", silent in any::<bool>()) {
        let mut r = resolver(1, PortRange::unprivileged());
        let mut ctx = ResolutionContext::new(Environment::from_pairs([(name.clone(), value.clone())]))
            .silent(silent);

        let output = render(&parse(&format!("{{{{ {name} }}}}")), &mut ctx, &mut r).unwrap();
        prop_assert_eq!(output, value);
    }

    // Silent rendering never prompts and blanks unknown names
    #[test]
    fn silent_mode_blanks_missing(names in prop::collection::vec("[A-Z][A-Z0-9_]{0,8}", 1..8)) {
        let text: String = names.iter().map(|n| format!("{n}={{{{ {n} }}}}\n")).collect();
        let expected: String = names.iter().map(|n| format!("{n}=\n")).collect();

        let mut r = resolver(2, PortRange::unprivileged());
        let mut ctx = ResolutionContext::new(Environment::default()).silent(true);

        prop_assert_eq!(render(&parse(&text), &mut ctx, &mut r).unwrap(), expected);
        prop_assert!(r.into_prompter().asked().is_empty());
    }
}
