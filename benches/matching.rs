//! Build-once / query-many benchmark over a synthetic name corpus.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use namelink::{BatchCoordinator, IndexOptions, MatchConfig, QueryEngine, ReferenceIndex};

const GIVEN: [&str; 16] = [
    "SMITH", "JOHNSON", "WILLIAMS", "BROWN", "JONES", "GARCIA", "MILLER", "DAVIS", "RODRIGUEZ",
    "MARTINEZ", "HERNANDEZ", "LOPEZ", "GONZALEZ", "WILSON", "ANDERSON", "JOHANSSON",
];

/// Deterministic corpus: base surnames plus single-character mutations.
fn synthetic_corpus(count: usize) -> Vec<String> {
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    (0..count)
        .map(|_| {
            let base = GIVEN[(next() % GIVEN.len() as u64) as usize];
            let mut chars: Vec<char> = base.chars().collect();
            let pos = (next() % chars.len() as u64) as usize;
            let sub = (b'A' + (next() % 26) as u8) as char;
            chars[pos] = sub;
            chars.into_iter().collect()
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let corpus = synthetic_corpus(50_000);
    c.bench_function("build_50k", |b| {
        // The corpus clone happens in setup so only the build is timed.
        b.iter_batched(
            || corpus.clone(),
            |corpus| ReferenceIndex::build(black_box(corpus), &IndexOptions::default()).unwrap(),
            BatchSize::LargeInput,
        )
    });
}

fn bench_query(c: &mut Criterion) {
    let corpus = synthetic_corpus(50_000);
    let index = ReferenceIndex::build(corpus, &IndexOptions::default()).unwrap();
    let engine = QueryEngine::new(
        Arc::new(index),
        MatchConfig::default().with_threshold(0.85),
    )
    .unwrap();

    c.bench_function("query_50k", |b| {
        b.iter(|| engine.query(black_box("JOHANSON")).unwrap())
    });
}

fn bench_batch(c: &mut Criterion) {
    let corpus = synthetic_corpus(50_000);
    let index = ReferenceIndex::build(corpus, &IndexOptions::default()).unwrap();
    let engine = QueryEngine::new(
        Arc::new(index),
        MatchConfig::default().with_threshold(0.85),
    )
    .unwrap();
    let coordinator = BatchCoordinator::new(Arc::new(engine)).unwrap();
    let queries = synthetic_corpus(256);

    c.bench_function("batch_256_over_50k", |b| {
        b.iter(|| coordinator.run_batch(black_box(&queries)))
    });
}

criterion_group!(benches, bench_build, bench_query, bench_batch);
criterion_main!(benches);
