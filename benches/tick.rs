use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quadbench::control::Algorithm;
use quadbench::plant::Params;
use quadbench::reference::Pattern;
use quadbench::sim::Simulator;

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for (name, algorithm) in [
        ("pid", Algorithm::Pid),
        ("smc", Algorithm::Smc),
        ("sts", Algorithm::Sts),
        ("mpc", Algorithm::Mpc),
    ] {
        let mut sim = Simulator::new(Params::default()).unwrap();
        sim.set_algorithm(algorithm);
        sim.set_pattern(Pattern::Figure8).unwrap();
        sim.set_wind_intensity(2.0).unwrap();

        group.bench_function(name, |b| {
            b.iter(|| {
                black_box(sim.step());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
