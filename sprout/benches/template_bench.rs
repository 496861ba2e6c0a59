use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sprout::port::allocator::{PortAllocator, PortLedger};
use sprout::port::registry::FixedPortSource;
use sprout::template::{parse, Environment, ScriptedPrompter};
use sprout::{render, PortRange, ResolutionContext, Resolver};

const SMALL: &str = "API_KEY={{ API_KEY }}\nPORT={{ auto_port() }}\nCOMPOSE=${COMPOSE_VAR:-x}\n";

fn template_text(lines: usize) -> String {
    (0..lines)
        .map(|i| match i % 3 {
            0 => format!("VAR_{i}={{{{ VAR_{i} }}}}\n"),
            1 => format!("PORT_{i}={{{{ auto_port() }}}}\n"),
            _ => format!("# literal line {i} with {{{{ broken\n"),
        })
        .collect()
}

fn environment(lines: usize) -> Environment {
    Environment::from_pairs((0..lines).map(|i| (format!("VAR_{i}"), format!("value{i}"))))
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("small", |b| {
        b.iter(|| parse(black_box(SMALL)));
    });

    for lines in [10, 100, 1000] {
        let text = template_text(lines);
        group.bench_with_input(BenchmarkId::new("lines", lines), &text, |b, text| {
            b.iter(|| parse(black_box(text)));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for lines in [10, 100] {
        let template = parse(&template_text(lines));
        let env = environment(lines);
        group.bench_with_input(BenchmarkId::new("lines", lines), &template, |b, template| {
            b.iter(|| {
                let allocator = PortAllocator::with_rng(
                    FixedPortSource::empty(),
                    PortRange::unprivileged(),
                    StdRng::seed_from_u64(1),
                );
                let mut resolver = Resolver::new(allocator, ScriptedPrompter::default());
                let mut ctx =
                    ResolutionContext::new(env.clone()).with_ports(PortLedger::default());
                render(black_box(template), &mut ctx, &mut resolver)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
