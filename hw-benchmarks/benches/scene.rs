use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use hw_scene::{compose, ornament_geometry, TreeConfig, TreeLayout};
use hw_snow::{SnowConfig, Snowfall};
use hw_wish::OrnamentType;
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;
use strum::IntoEnumIterator;

fn snowfall(c: &mut Criterion) {
    for count in [1000, 10_000] {
        c.bench_function(&format!("Snowfall::step ({count} flakes)"), |b| {
            let config = SnowConfig {
                count,
                ..SnowConfig::default()
            };
            let mut snow = Snowfall::new(config, &mut StdRng::seed_from_u64(12345));
            let mut elapsed = 0.;

            b.iter(|| {
                elapsed += 1. / 60.;
                snow.step(black_box(elapsed));
            });
        });
    }
}

fn decorations(c: &mut Criterion) {
    for ornament in OrnamentType::iter() {
        c.bench_function(&format!("ornament_geometry ({})", ornament.literal()), |b| {
            b.iter(|| ornament_geometry(black_box(ornament)));
        });
    }

    c.bench_function("compose", |b| {
        b.iter(|| compose(black_box("#ff4d6d"), black_box(OrnamentType::Heart), true));
    });

    c.bench_function("TreeLayout::generate", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(12345),
            |mut rng| TreeLayout::generate(TreeConfig::default(), &mut rng),
            BatchSize::SmallInput,
        );
    });
}

criterion_group! { scene, snowfall, decorations }
criterion_main! { scene }
