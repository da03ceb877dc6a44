//! 📊 How fast do we sort 20k entries into news and not-news? Let's not guess.

use cfx::common::Record;
use cfx::joiner::TypedRecordFilterJoiner;
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

// -- 🏗️ a synthetic export: every 4th entry is news, every 10th is an alert, the rest is filler
fn synthetic_export(size: usize) -> Vec<Record> {
    (0..size)
        .map(|i| {
            let the_type = if i % 10 == 0 {
                "alert"
            } else if i % 4 == 0 {
                "news"
            } else {
                "page"
            };
            let the_refs: Vec<_> = (0..3)
                .map(|k| json!({ "sys": { "id": format!("r{}", (i + k * 10) / 10 * 10) } }))
                .collect();
            Record::new(json!({
                "sys": { "id": format!("r{i}"), "contentType": { "sys": { "id": the_type } } },
                "fields": {
                    "title": { "en-GB": format!("Entry {i}") },
                    "alertsInline": { "en-GB": the_refs }
                }
            }))
        })
        .collect()
}

fn bench_joiner(c: &mut Criterion) {
    let the_export = synthetic_export(20_000);

    let the_filter_only = TypedRecordFilterJoiner::new("news", false);
    c.bench_function("filter_only_20k", |b| {
        b.iter_batched(
            || the_export.clone(),
            |records| black_box(the_filter_only.process(records)),
            BatchSize::LargeInput,
        )
    });

    let the_filter_and_join = TypedRecordFilterJoiner::new("news", true);
    c.bench_function("filter_and_join_20k", |b| {
        b.iter_batched(
            || the_export.clone(),
            |records| black_box(the_filter_and_join.process(records)),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_joiner);
criterion_main!(benches);
