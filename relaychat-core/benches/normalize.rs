use criterion::{black_box, criterion_group, criterion_main, Criterion};
use relaychat_core::history::normalize;
use serde_json::{json, Value};

fn history_of(len: usize) -> Vec<Value> {
    (0..len)
        .map(|i| {
            if i % 10 == 9 {
                json!(format!("stray entry {}", i))
            } else {
                json!({"user": format!("question {}", i), "bot": format!("answer {}", i)})
            }
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let short = history_of(4);
    let long = history_of(200);

    c.bench_function("normalize_4_entries", |b| {
        b.iter(|| normalize(black_box(&short), black_box("next question")))
    });
    c.bench_function("normalize_200_entries", |b| {
        b.iter(|| normalize(black_box(&long), black_box("next question")))
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
