use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glowwatch_store::{MetricFamily, SnapshotStore};

static SLOW_TRACES: MetricFamily = MetricFamily::new(
    "slow_trace_transaction_count",
    "Transaction count per slow trace",
    &["group_id", "member_id", "transaction_name"],
);

static MEMBER_OF_GROUP: MetricFamily = MetricFamily::new(
    "member_of_group",
    "Information about Glowroot agent IDs",
    &["group_id", "member_id"],
);

/// Fill a store the way one cycle over `groups` x `members` would.
fn populated_store(groups: usize, members: usize, transactions: usize) -> SnapshotStore {
    let store = SnapshotStore::new();
    for g in 0..groups {
        let group = format!("group-{}", g);
        for m in 0..members {
            let member = format!("{}::member-{}", group, m);
            store.set(&MEMBER_OF_GROUP, &[group.as_str(), member.as_str()], 1.0);
            for t in 0..transactions {
                let transaction = format!("GET /endpoint/{}", t);
                store.set(
                    &SLOW_TRACES,
                    &[group.as_str(), member.as_str(), transaction.as_str()],
                    (g * 100 + m * 10 + t) as f64,
                );
            }
        }
    }
    store
}

/// Benchmark collect_all() with varying member counts
fn bench_collect_varying_members(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_varying_members");

    for member_count in [1, 10, 50, 100].iter() {
        let store = populated_store(1, *member_count, 10);

        group.bench_with_input(
            BenchmarkId::from_parameter(member_count),
            member_count,
            |b, _| {
                b.iter(|| {
                    black_box(store.collect_all().count());
                });
            },
        );
    }
    group.finish();
}

/// Benchmark collect_all() with a realistic workload (several rollups, top-10 transactions)
fn bench_collect_realistic_workload(c: &mut Criterion) {
    let store = populated_store(10, 20, 10);

    c.bench_function("collect_realistic_workload", |b| {
        b.iter(|| {
            black_box(store.collect_all().count());
        });
    });
}

/// Benchmark overwriting existing points (the steady-state write path)
fn bench_set_existing_point(c: &mut Criterion) {
    let store = populated_store(1, 1, 10);

    c.bench_function("set_existing_point", |b| {
        b.iter(|| {
            store.set(
                &SLOW_TRACES,
                black_box(&["group-0", "group-0::member-0", "GET /endpoint/3"]),
                black_box(42.0),
            );
        });
    });
}

/// Benchmark empty collect_all() to measure baseline overhead
fn bench_collect_empty(c: &mut Criterion) {
    let store = SnapshotStore::new();

    c.bench_function("collect_empty", |b| {
        b.iter(|| {
            black_box(store.collect_all().count());
        });
    });
}

criterion_group!(
    benches,
    bench_collect_varying_members,
    bench_collect_realistic_workload,
    bench_set_existing_point,
    bench_collect_empty
);
criterion_main!(benches);
