//! Criterion benchmarks for batch rescoring.
//!
//! Measures rescoring throughput against an in-memory store for several batch
//! sizes.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package sundowner-scorer
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sundowner_core::test_support::MemoryStore;
use sundowner_core::{ContentItem, Votes, WeightConfig};
use sundowner_scorer::{RescoreOptions, rescore};

/// Batch sizes to benchmark.
const BATCH_SIZES: &[u64] = &[1_000, 10_000, 100_000];

/// Evaluation instant used by every run.
const NOW: i64 = 1_357_084_800;

/// Build a deterministic batch with varied votes and creation times.
fn build_items(size: u64) -> Vec<ContentItem> {
    (0..size)
        .map(|index| {
            let votes = Votes::new(index.rem_euclid(97), index.rem_euclid(13));
            let age = i64::try_from(index.saturating_mul(611)).unwrap_or(i64::MAX);
            ContentItem::new(format!("item-{index}"), votes, NOW.saturating_sub(age))
        })
        .collect()
}

fn bench_rescore(c: &mut Criterion) {
    let mut group = c.benchmark_group("rescore");
    let options = RescoreOptions::new(NOW, WeightConfig::default());

    for &size in BATCH_SIZES {
        let items = build_items(size);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("items", size), &items, |b, items| {
            b.iter_batched(
                || MemoryStore::with_items(items.clone()),
                |mut store| black_box(rescore(&mut store, &options)),
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rescore);
criterion_main!(benches);
