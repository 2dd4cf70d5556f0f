use brain_core::tokenizer::extract_keywords;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_extract_keywords(c: &mut Criterion) {
    let text = "Widget API creates, updates and deletes widgets for the inventory service. ".repeat(200);
    c.bench_function("extract_keywords_long_text", |b| b.iter(|| extract_keywords(&text, 20)));
}

criterion_group!(benches, bench_extract_keywords);
criterion_main!(benches);
