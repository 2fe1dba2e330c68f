//! Merge benchmarks.
//!
//! Run with: `cargo bench --bench merge`
//!
//! The merge is the only O(n log n) step in the pipeline; these track
//! its cost as the store grows toward capped-ingestion sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::TimeZone;
use chrono::Utc;
use timeline_kernel::{merge, CanonicalEvent, Provenance, SequenceId, TimelineStore};

/// Build a store with pseudo-shuffled timestamps.
fn build_store(n: usize) -> TimelineStore {
    let mut store = TimelineStore::new();
    for i in 0..n {
        // Deterministic scatter so adjacent inserts are out of order.
        let millis = ((i * 48_271) % n) as i64 * 1_000;
        store.append(CanonicalEvent {
            timestamp: Utc.timestamp_millis_opt(millis).unwrap(),
            sequence_id: SequenceId::new(i as u64),
            source: Provenance::ALL[i % Provenance::ALL.len()],
            event_kind: "FileModified".to_string(),
            description: format!(r"C:\Windows\System32\file{i}.dll"),
            details: format!(r"File: C:\Windows\System32\file{i}.dll"),
            user: "(unknown)".to_string(),
            host: "localhost".to_string(),
        });
    }
    store
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for size in [1_000usize, 10_000, 50_000] {
        let store = build_store(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| merge(black_box(store)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_merge);
criterion_main!(benches);
