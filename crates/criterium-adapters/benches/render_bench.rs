//! Rendering throughput for both grammars.

use criterion::{Criterion as Bench, criterion_group, criterion_main};
use criterium_adapters::query::{RenderRequest, sql2, xpath};
use criterium_core::criterion::restrictions::{and, between, contains, eq, is_not_null, like, not, or};
use criterium_core::criterion::{Criterion, MatchMode, Order};
use std::hint::black_box;

fn sample() -> Criterion {
    and([
        is_not_null("@title").unwrap(),
        or([
            like("@title", "news", MatchMode::Start).unwrap(),
            contains(".", "weather report").unwrap(),
        ]),
        not(eq("@hidden", true).unwrap()),
        between("@rank", 1, 100).unwrap(),
    ])
}

fn bench_render(c: &mut Bench) {
    let criterion = sample();
    let order = [Order::desc("@rank").unwrap(), Order::by_score()];
    let request = RenderRequest::new(&criterion)
        .with_node_type(Some("nt:unstructured"))
        .with_order(&order);

    c.bench_function("render_xpath", |b| {
        b.iter(|| xpath::render(black_box(&request)));
    });
    c.bench_function("render_sql2", |b| {
        b.iter(|| sql2::render(black_box(&request)));
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
