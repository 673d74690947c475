use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jobly_db::{Changeset, ColumnAliases, CompanyFilter, partial_update};

const WIDE: ColumnAliases = ColumnAliases::new(&[("col0", "column_zero"), ("col1", "column_one")]);

fn changeset(n: usize) -> Changeset {
    let mut changes = Changeset::new();
    for i in 0..n {
        changes.push(format!("col{i}"), i as i64);
    }
    changes
}

fn bench_partial_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builders/partial_update");

    for n in [1, 5, 10, 50] {
        let changes = changeset(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &changes, |b, changes| {
            b.iter(|| black_box(partial_update(changes, &WIDE)));
        });
    }

    group.finish();
}

fn bench_company_filter(c: &mut Criterion) {
    let filter = CompanyFilter {
        min_employees: Some(10),
        max_employees: Some(500),
        name: Some("net".to_string()),
    };
    c.bench_function("sql_builders/company_filter", |b| {
        b.iter(|| black_box(filter.build()));
    });
}

criterion_group!(benches, bench_partial_update, bench_company_filter);
criterion_main!(benches);
