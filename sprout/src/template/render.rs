//! Rendering a parsed template.

use rand::Rng;

use crate::error::Result;
use crate::port::registry::PortSource;

use super::parser::Template;
use super::prompt::Prompter;
use super::resolver::{ResolutionContext, Resolver};

/// Renders `template` by resolving every segment in order.
///
/// The output is built entirely in memory. On error nothing is returned,
/// but ports claimed before the failing segment stay claimed in `ctx`, so
/// later files of the same run still never reuse them.
///
/// # Errors
///
/// Returns the first error from [`Resolver::resolve`].
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use sprout::port::allocator::PortAllocator;
/// use sprout::port::registry::FixedPortSource;
/// use sprout::template::{parse, render, Environment, ResolutionContext, Resolver, ScriptedPrompter};
/// use sprout::PortRange;
///
/// let mut resolver = Resolver::new(
///     PortAllocator::with_rng(FixedPortSource::empty(), PortRange::unprivileged(), StdRng::seed_from_u64(9)),
///     ScriptedPrompter::default(),
/// );
/// let mut ctx = ResolutionContext::new(Environment::from_pairs([("API_KEY", "secret")])).silent(true);
///
/// let output = render(&parse("KEY={{ API_KEY }}\nKEEP=${KEEP:-x}\n"), &mut ctx, &mut resolver).unwrap();
/// assert_eq!(output, "KEY=secret\nKEEP=${KEEP:-x}\n");
/// ```
pub fn render<P, S, R>(
    template: &Template,
    ctx: &mut ResolutionContext,
    resolver: &mut Resolver<P, S, R>,
) -> Result<String>
where
    P: Prompter,
    S: PortSource,
    R: Rng,
{
    let capacity = template.segments().iter().map(|s| s.raw().len()).sum();
    let mut output = String::with_capacity(capacity);
    for segment in template.segments() {
        output.push_str(&resolver.resolve(segment, ctx)?);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::allocator::{PortAllocator, PortLedger};
    use crate::port::registry::FixedPortSource;
    use crate::template::{parse, Environment, ScriptedPrompter};
    use crate::{Error, Port, PortRange};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn port(value: u16) -> Port {
        Port::try_from(value).unwrap()
    }

    fn resolver_in(
        range: PortRange,
        prompter: ScriptedPrompter,
    ) -> Resolver<ScriptedPrompter, FixedPortSource, StdRng> {
        Resolver::new(
            PortAllocator::with_rng(FixedPortSource::empty(), range, StdRng::seed_from_u64(11)),
            prompter,
        )
    }

    #[test]
    fn test_literal_only_is_identity() {
        let text = "A=1\r\nB={{ not valid }}\nC=${C:-d}";
        let mut r = resolver_in(PortRange::unprivileged(), ScriptedPrompter::default());
        let mut ctx = ResolutionContext::new(Environment::default());

        assert_eq!(render(&parse(text), &mut ctx, &mut r).unwrap(), text);
    }

    #[test]
    fn test_full_example() {
        let text = "API_KEY={{ API_KEY }}\nPORT={{ auto_port() }}\nKEEP=${KEEP:-x}\n";
        let mut r = resolver_in(PortRange::unprivileged(), ScriptedPrompter::default());
        let mut ctx = ResolutionContext::new(Environment::from_pairs([("API_KEY", "secret")]))
            .with_ports(PortLedger::new([port(8080)]));

        let output = render(&parse(text), &mut ctx, &mut r).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "API_KEY=secret");
        let value: u16 = lines[1].strip_prefix("PORT=").unwrap().parse().unwrap();
        assert!(value >= 1024);
        assert_ne!(value, 8080);
        assert_eq!(lines[2], "KEEP=${KEEP:-x}");
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_ports_distinct_across_templates() {
        let mut r = resolver_in(
            PortRange::new(port(20000), port(20003)).unwrap(),
            ScriptedPrompter::default(),
        );
        let mut ctx = ResolutionContext::new(Environment::default());

        let first = render(&parse("{{ auto_port() }},{{ auto_port() }}"), &mut ctx, &mut r).unwrap();
        let second = render(&parse("{{ auto_port() }},{{ auto_port() }}"), &mut ctx, &mut r).unwrap();

        let mut all: Vec<&str> = first.split(',').chain(second.split(',')).collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all, vec!["20000", "20001", "20002", "20003"]);
    }

    #[test]
    fn test_exhaustion_fails_render_but_keeps_claims() {
        let mut r = resolver_in(
            PortRange::new(port(30000), port(30000)).unwrap(),
            ScriptedPrompter::default(),
        );
        let mut ctx = ResolutionContext::new(Environment::default());

        let err = render(&parse("{{ auto_port() }} {{ auto_port() }}"), &mut ctx, &mut r)
            .unwrap_err();
        assert!(matches!(err, Error::PortExhausted { claimed: 1, .. }));
        assert!(ctx.ports().claimed().contains(&port(30000)));
    }

    #[test]
    fn test_prompt_once_per_name() {
        let mut r = resolver_in(PortRange::unprivileged(), ScriptedPrompter::new(["v"]));
        let mut ctx = ResolutionContext::new(Environment::default());

        let output = render(&parse("{{ X }}-{{ X }}"), &mut ctx, &mut r).unwrap();
        assert_eq!(output, "v-v");
    }
}
