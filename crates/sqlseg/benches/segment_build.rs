use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlseg::{BindVarStyle, Builder, QueryBuilder, Segment, Table};

/// `SELECT c0, c1, ... FROM t WHERE c0 = $1 AND c1 = $1 ...` with `n` columns
/// and `n` condition segments.
fn select_segment(n: usize) -> Segment {
    let t = Table::new("t", "t");
    let names: Vec<String> = (0..n).map(|i| format!("c{i}")).collect();
    let conditions = names.iter().enumerate().map(|(i, name)| {
        Segment::new("#c1 = $1")
            .column(t.column(name))
            .arg(i as i64)
    });
    let where_clause = Segment::new("#join('#s', ' AND ')")
        .segments(conditions)
        .prefix("WHERE");
    Segment::new("SELECT #join('#c', ', ') FROM #t1 #s1")
        .columns(names.iter().map(|name| t.column(name)))
        .table(t.clone())
        .segment(where_clause)
}

fn bench_segment_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment/build");

    for n in [1, 5, 10, 50, 100] {
        let segment = select_segment(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &segment, |b, segment| {
            b.iter(|| black_box(segment.build().unwrap()));
        });
    }

    group.finish();
}

fn bench_positional_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment/positional_in_list");

    for n in [5, 20, 100, 500] {
        let segment = Segment::new("id IN (#join('#?', ', '))").args(0..n as i64);
        group.bench_with_input(BenchmarkId::from_parameter(n), &segment, |b, segment| {
            b.iter(|| black_box(segment.build().unwrap()));
        });
    }

    group.finish();
}

fn bench_query_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/optional_joins");

    for joins in [1, 5, 20] {
        let anchor = Table::new("anchor", "a");
        let mut qb = QueryBuilder::new()
            .distinct()
            .select([anchor.column("id")])
            .from(anchor.clone())
            .bind_var(BindVarStyle::Indexed);
        for i in 0..joins {
            let joined = Table::new(format!("j{i}"), format!("j{i}"));
            qb = qb.left_join_optional(
                joined.clone(),
                Segment::new("#c1=#c2").columns([joined.column("a_id"), anchor.column("id")]),
            );
        }
        let qb = qb.eq(Table::new("j0", "j0").column("flag"), true);

        group.bench_with_input(BenchmarkId::from_parameter(joins), &qb, |b, qb| {
            b.iter(|| black_box(qb.build().unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_segment_build,
    bench_positional_join,
    bench_query_builder
);
criterion_main!(benches);
