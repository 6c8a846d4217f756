use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glowwatch_store::{MetricFamily, SnapshotStore};
use std::sync::Arc;
use std::thread;

static ERRORS: MetricFamily = MetricFamily::new(
    "error_total_count",
    "Total error count from overall statistics",
    &["group_id", "member_id"],
);

/// Benchmark concurrent writes to the same point (high contention)
fn bench_concurrent_writes_same_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_writes_same_point");

    for thread_count in [2, 4, 8].iter() {
        group.throughput(Throughput::Elements(*thread_count as u64 * 1000));
        group.bench_with_input(
            BenchmarkId::from_parameter(thread_count),
            thread_count,
            |b, &thread_count| {
                b.iter(|| {
                    let store = Arc::new(SnapshotStore::new());

                    let mut handles_vec = vec![];

                    for _ in 0..thread_count {
                        let store = Arc::clone(&store);
                        handles_vec.push(thread::spawn(move || {
                            for i in 0..1000 {
                                store.set(&ERRORS, black_box(&["g1", "m1"]), i as f64);
                            }
                        }));
                    }

                    for join_handle in handles_vec {
                        join_handle.join().unwrap();
                    }
                });
            },
        );
    }
    group.finish();
}

/// Benchmark writers racing a scraping reader
fn bench_writes_during_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("writes_during_collect");

    for thread_count in [1, 2, 4].iter() {
        group.throughput(Throughput::Elements(*thread_count as u64 * 1000));
        group.bench_with_input(
            BenchmarkId::new("writers", thread_count),
            thread_count,
            |b, &thread_count| {
                b.iter(|| {
                    let store = Arc::new(SnapshotStore::new());

                    let mut handles_vec = vec![];

                    for writer in 0..thread_count {
                        let store = Arc::clone(&store);
                        handles_vec.push(thread::spawn(move || {
                            let member = format!("m{}", writer);
                            for i in 0..1000 {
                                store.set(&ERRORS, &["g1", member.as_str()], i as f64);
                            }
                        }));
                    }

                    let reader = {
                        let store = Arc::clone(&store);
                        thread::spawn(move || {
                            for _ in 0..100 {
                                black_box(store.collect_all().count());
                            }
                        })
                    };

                    for join_handle in handles_vec {
                        join_handle.join().unwrap();
                    }
                    reader.join().unwrap();
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_concurrent_writes_same_point,
    bench_writes_during_collect
);
criterion_main!(benches);
