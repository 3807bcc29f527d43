//! Projection benchmark suite
//!
//! The table is rebuilt after every applied report and every filter change, so
//! `project` runs far more often than anything else:
//! - Unfiltered projection at various contestant counts
//! - Filtered projection (substring match on test-case names)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use uibench_results::render::text_table;
use uibench_results::simulate::{self, SimConfig};
use uibench_results::{project, ReportChannel, ResultStore};

fn populated_store(contestants: usize) -> ResultStore {
    let cfg = SimConfig::full(7);
    let mut store = ResultStore::new();
    let mut channel = ReportChannel::new(&mut store);
    for event in simulate::generate(&cfg, contestants) {
        channel.apply(event);
    }
    store
}

fn bench_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");

    for n in [2usize, 8, 32] {
        let store = populated_store(n);

        for filter in ["", "table", "render"] {
            let label = if filter.is_empty() { "all" } else { filter };
            group.bench_with_input(
                BenchmarkId::new(format!("filter_{label}"), n),
                &store,
                |bencher, store| bencher.iter(|| black_box(project(store, black_box(filter)))),
            );
        }
    }

    group.finish();
}

/// Projection plus text rendering, as done on every refresh of the CLI watch mode
fn bench_render(c: &mut Criterion) {
    let store = populated_store(13);
    c.bench_function("project_and_render_text", |bencher| {
        bencher.iter(|| black_box(text_table(&project(black_box(&store), ""))))
    });
}

criterion_group!(benches, bench_project, bench_render);
criterion_main!(benches);
