use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fframe_join::{JoinConfig, JoinKind, join, plan_join};
use fframe_types::{Column, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEED: u64 = 0x5eed_f00d;

#[derive(Clone, Debug)]
struct JoinFixture {
    left: Table,
    right: Table,
}

/// Two tables keyed on (`region`, `id`) with `distinct` ids per region.
fn build_fixture(rows: usize, distinct: i64, seed: u64) -> JoinFixture {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut side = |value_name: &str| {
        let regions: Vec<String> = (0..rows)
            .map(|_| format!("region-{}", rng.gen_range(0..8)))
            .collect();
        let ids: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..distinct)).collect();
        let values: Vec<f64> = (0..rows).map(|_| rng.r#gen::<f64>()).collect();
        Table::new(
            ["region", "id", value_name],
            vec![
                Column::from_strs(regions),
                Column::from_i64s(ids),
                Column::from_f64s(values),
            ],
        )
        .expect("fixture columns share one length")
    };
    let left = side("lval");
    let right = side("rval");
    JoinFixture { left, right }
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("join_plan");
    for rows in [4_096_usize, 65_536_usize] {
        let fixture = build_fixture(rows, (rows / 4) as i64, SEED);
        group.throughput(Throughput::Elements((rows * 2) as u64));
        for kind in [JoinKind::Inner, JoinKind::Left, JoinKind::Outer] {
            group.bench_with_input(
                BenchmarkId::new(kind.as_str(), rows),
                &fixture,
                |b, fixture| {
                    b.iter(|| {
                        plan_join(
                            &fixture.left,
                            &fixture.right,
                            &["region", "id"],
                            kind,
                            &JoinConfig::default(),
                        )
                        .expect("plan should succeed")
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("join_materialize");
    for rows in [4_096_usize, 16_384_usize] {
        let fixture = build_fixture(rows, rows as i64, SEED ^ 1);
        group.throughput(Throughput::Elements((rows * 2) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &fixture, |b, fixture| {
            b.iter(|| {
                join(&fixture.left, &fixture.right, &["id"], JoinKind::Outer)
                    .expect("join should succeed")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plan, bench_materialize);
criterion_main!(benches);
