use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jobly::models::{COMPANIES, JOBS};
use jobly::qb::{FieldMap, FilterCriteria, build_update};

/// A field map with `n` columns plus one reserved metadata key.
fn field_map(n: usize) -> FieldMap {
    let mut fields: FieldMap = (0..n).map(|i| (format!("col{i}"), i as i64)).collect();
    fields.insert("_token", "abc");
    fields
}

fn bench_build_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_update");

    for n in [1, 5, 10, 50, 100] {
        let fields = field_map(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &fields, |b, fields| {
            b.iter(|| black_box(build_update("t", fields, "id", 1i64, None)));
        });
    }

    group.finish();
}

fn bench_entity_update(c: &mut Criterion) {
    let fields = FieldMap::new()
        .with("name", "Acme Corp")
        .with("num_employees", 250)
        .with("description", "Anvils")
        .with("_token", "abc");

    c.bench_function("sql_builder/companies_update", |b| {
        b.iter(|| black_box(COMPANIES.update(&fields, "acme")));
    });
}

fn bench_filter_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/filter_query");

    let cases = [
        ("none", FilterCriteria::new()),
        ("search", FilterCriteria::new().with("search", "eng")),
        (
            "all",
            FilterCriteria::new()
                .with("search", "eng")
                .with("min_salary", 50_000)
                .with("min_equity", 0.1),
        ),
    ];

    for (name, criteria) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), criteria, |b, criteria| {
            b.iter(|| black_box(JOBS.search(criteria)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build_update,
    bench_entity_update,
    bench_filter_query
);
criterion_main!(benches);
