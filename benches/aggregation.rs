//! Aggregation benchmark suite
//!
//! Measures the inbound path:
//! - `ResultStore::update` merging repeated runs
//! - Full channel delivery (decode + validate + merge) of wire messages

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use uibench_results::simulate::{self, SimConfig};
use uibench_results::{ReportChannel, ResultStore};

fn session(contestants: usize) -> Vec<uibench_results::ReportEvent> {
    let cfg = SimConfig::full(42);
    simulate::generate(&cfg, contestants)
}

/// Benchmark store merges of decoded reports
fn bench_store_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_update");

    for n in [2usize, 8, 32] {
        let events = session(n);
        group.bench_with_input(BenchmarkId::new("merge", n), &events, |bencher, events| {
            bencher.iter(|| {
                let mut store = ResultStore::new();
                for e in events {
                    let _ = store.update(&e.name, &e.version, e.samples.clone());
                }
                black_box(store)
            })
        });
    }

    group.finish();
}

/// Benchmark raw message delivery through the channel
fn bench_channel_deliver(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_deliver");

    for n in [2usize, 8, 32] {
        let lines: Vec<String> = session(n)
            .iter()
            .map(|e| e.to_message().unwrap().to_string())
            .collect();
        group.bench_with_input(BenchmarkId::new("deliver_str", n), &lines, |bencher, lines| {
            bencher.iter(|| {
                let mut store = ResultStore::new();
                let mut channel = ReportChannel::new(&mut store);
                for line in lines {
                    black_box(channel.deliver_str(black_box(line)));
                }
                black_box(store.revision())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_store_update, bench_channel_deliver);
criterion_main!(benches);
