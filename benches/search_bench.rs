use criterion::{criterion_group, criterion_main, Criterion};
use docsearch::{process_queries, DocumentStatus, SearchEngine};

const DICTIONARY: &[&str] = &[
    "cat", "dog", "rat", "pet", "bird", "curly", "nasty", "funny", "fluffy", "tail", "collar",
    "hair", "city", "town", "house", "white", "black", "grey", "big", "small", "fast", "slow",
    "quiet", "loud", "wild", "tame", "young", "old", "warm", "cold",
];

/// Deterministic corpus: document i holds `words_per_doc` dictionary words
/// picked by a fixed stride, so runs are reproducible.
fn build_engine(doc_count: usize, words_per_doc: usize) -> SearchEngine {
    let mut engine = SearchEngine::from_stop_words_text("and with in the").unwrap();
    for id in 0..doc_count {
        let text: Vec<&str> = (0..words_per_doc)
            .map(|position| DICTIONARY[(id * 7 + position * 13) % DICTIONARY.len()])
            .collect();
        engine
            .add_document(
                id as i32,
                &text.join(" "),
                DocumentStatus::Actual,
                &[(id % 10) as i32],
            )
            .unwrap();
    }
    engine
}

fn bench_find_top_documents(c: &mut Criterion) {
    let engine = build_engine(2_000, 40);
    let query = "curly cat fluffy dog -nasty -cold";

    c.bench_function("find_top_documents/sequential", |b| {
        b.iter(|| engine.find_top_documents(query).unwrap())
    });
    c.bench_function("find_top_documents/parallel", |b| {
        b.iter(|| engine.find_top_documents_par(query).unwrap())
    });
}

fn bench_match_document(c: &mut Criterion) {
    let engine = build_engine(500, 40);
    let query = "curly cat fluffy dog white tail -nasty";

    c.bench_function("match_document/sequential", |b| {
        b.iter(|| {
            engine
                .document_ids()
                .map(|id| engine.match_document(query, id).unwrap().0.len())
                .sum::<usize>()
        })
    });
    c.bench_function("match_document/parallel", |b| {
        b.iter(|| {
            engine
                .document_ids()
                .map(|id| engine.match_document_par(query, id).unwrap().0.len())
                .sum::<usize>()
        })
    });
}

fn bench_process_queries(c: &mut Criterion) {
    let engine = build_engine(1_000, 40);
    let queries: Vec<String> = (0..50)
        .map(|i| {
            format!(
                "{} {} -{}",
                DICTIONARY[i % DICTIONARY.len()],
                DICTIONARY[(i * 3 + 1) % DICTIONARY.len()],
                DICTIONARY[(i * 5 + 2) % DICTIONARY.len()]
            )
        })
        .collect();

    c.bench_function("process_queries/50", |b| {
        b.iter(|| process_queries(&engine, &queries).unwrap())
    });
}

criterion_group!(
    benches,
    bench_find_top_documents,
    bench_match_document,
    bench_process_queries
);
criterion_main!(benches);
