use criterion::{criterion_group, criterion_main, Criterion};
use lazyseq_operators::Seq;
use lazyseq_planner::{lower, parse_query, PlannerConfig, Record};

fn make_records(rows: usize) -> Vec<Record> {
    (0..rows)
        .map(|i| {
            Record::new()
                .with("group", format!("group-{}", i % 4))
                .with("order", i as i64)
                .with("value", (i % 10) as f64)
        })
        .collect()
}

fn bench_filter_select(c: &mut Criterion) {
    let source = Seq::range(0, 10_000).unwrap();
    let pipeline = source.filter(|x| x % 3 == 0).select(|x| i64::from(x) * 2);
    c.bench_function("filter_select_10k", |b| {
        b.iter(|| {
            let _ = pipeline.to_vec().unwrap();
        })
    });
}

fn bench_order_by_then_by(c: &mut Criterion) {
    let source = Seq::from_vec(make_records(4096));
    let ordered = source
        .order_by(|r| r.value("group"))
        .then_by_descending(|r| r.value("order"));
    c.bench_function("order_by_then_by_4k", |b| {
        b.iter(|| {
            let _ = ordered.to_vec().unwrap();
        })
    });
}

fn bench_group_join(c: &mut Criterion) {
    let owners = Seq::range(0, 1000).unwrap();
    let items = Seq::range(0, 10_000).unwrap();
    let joined = owners.group_join(&items, |o| *o, |i| i % 1000, |o, group| (o, group.known_count()));
    c.bench_function("group_join_1k_x_10k", |b| {
        b.iter(|| {
            let _ = joined.to_vec().unwrap();
        })
    });
}

fn bench_query_document(c: &mut Criterion) {
    let doc = parse_query(
        r#"
steps:
  - { op: filter, expr: "value >= 5" }
  - { op: group_count, field: group }
"#,
    )
    .unwrap();
    let source = Seq::from_vec(make_records(4096));
    let config = PlannerConfig::default();
    c.bench_function("query_group_count_4k", |b| {
        b.iter(|| {
            let _ = lower(&doc, source.clone(), &config).unwrap().to_vec().unwrap();
        })
    });
}

criterion_group!(
    operators,
    bench_filter_select,
    bench_order_by_then_by,
    bench_group_join
);
criterion_group!(planner, bench_query_document);
criterion_main!(operators, planner);
