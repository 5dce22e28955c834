//! Search Performance Benchmarks
//!
//! Index build and query latency over a synthetic bibliography.
//!
//! Run with: `cargo bench --bench search_performance`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::time::Duration;

use bibliography_server::document::{DocumentSource, MemoryDocument, OutlineEntry};
use bibliography_server::outline::{build_tree, find_anchor};
use bibliography_server::search::{IndexStore, SearchEngine};
use tempfile::TempDir;

const AUTHORS: [&str; 6] = ["Blake", "Milton", "Wordsworth", "Coleridge", "Shelley", "Keats"];

/// Build a document whose pages read like bibliography entries
fn create_bibliography(page_count: usize) -> MemoryDocument {
    let pages = (0..page_count).map(|i| {
        let mut page = format!("Part {}\n", i / 20 + 1);
        for entry in 0..30 {
            let author = AUTHORS[(i + entry) % AUTHORS.len()];
            page.push_str(&format!(
                "{}. {}, Collected Works, vol. {} (London, {})\n",
                entry + 1,
                author,
                entry % 7 + 1,
                1790 + (i * 30 + entry) % 200
            ));
        }
        page
    });
    MemoryDocument::new(pages.collect::<Vec<_>>())
}

/// Benchmark building the index from scratch
fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    for page_count in [100, 500] {
        let document = create_bibliography(page_count);
        group.bench_with_input(
            BenchmarkId::from_parameter(page_count),
            &document,
            |b, document| {
                let temp_dir = TempDir::new().unwrap();
                let store = IndexStore::new(temp_dir.path().join("index"));
                b.iter(|| black_box(store.build(document).unwrap()))
            },
        );
    }

    group.finish();
}

/// Benchmark queries against a prebuilt index
fn bench_query(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let source: Arc<dyn DocumentSource> = Arc::new(create_bibliography(500));
    let engine = SearchEngine::new(IndexStore::new(temp_dir.path().join("index")), Some(source));
    assert!(engine.ensure_index());

    let mut group = c.benchmark_group("query");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(50);

    for query in ["Blake", "blake milton", "\"Collected Works\"", "Keats AND London"] {
        group.bench_with_input(BenchmarkId::from_parameter(query), query, |b, query| {
            b.iter(|| black_box(engine.search(black_box(query), false)))
        });
    }

    group.finish();
}

/// Benchmark anchor lookup on a deep outline
fn bench_anchor_lookup(c: &mut Criterion) {
    let flat: Vec<OutlineEntry> = (0..2000)
        .map(|i| OutlineEntry::new((i % 4 + 1) as u32, format!("Section {}", i), i as i32 + 1))
        .collect();
    let tree = build_tree(&flat);

    c.bench_function("find_anchor_last", |b| {
        b.iter(|| black_box(find_anchor(&tree, black_box("Section 1999"))))
    });
}

criterion_group!(benches, bench_index_build, bench_query, bench_anchor_lookup);
criterion_main!(benches);
