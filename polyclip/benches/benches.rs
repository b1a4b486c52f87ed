use criterion::{criterion_group, criterion_main, Bencher, BenchmarkId, Criterion};
use polyclip::{
    inflate_paths, intersect, rect_clip, union, EndType, FillRule, JoinType, OffsetOptions, Path64,
    Rect64,
};
mod test_paths;
use test_paths::*;

fn bench_union(b: &mut Bencher, subject: &Path64, clip: &Path64) {
    let subjects = [subject.clone()];
    let clips = [clip.clone()];
    b.iter(|| union(&subjects, &clips, FillRule::NonZero).unwrap())
}

fn bench_self_union(b: &mut Bencher, subject: &Path64) {
    let subjects = [subject.clone()];
    b.iter(|| union(&subjects, &[], FillRule::EvenOdd).unwrap())
}

fn boolean_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("boolean");
    let point_counts = &[10, 100, 1000];
    for &i in point_counts {
        let subject = star(i, 10_000.0, 4_000.0, 0.0);
        let clip = star(i, 10_000.0, 4_000.0, 0.1);
        group.bench_with_input(BenchmarkId::new("union_stars", i), &i, |b, _| {
            bench_union(b, &subject, &clip)
        });
    }
    for &i in &[25, 250, 2500] {
        let subject = pathological1(i);
        group.bench_with_input(BenchmarkId::new("pathological_self_union", i), &i, |b, _| {
            bench_self_union(b, &subject)
        });
    }

    group.finish();
}

fn offset_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("offset");
    let subject = [star(100, 10_000.0, 4_000.0, 0.0)];
    for join in [JoinType::Square, JoinType::Bevel, JoinType::Round, JoinType::Miter] {
        group.bench_function(BenchmarkId::new("star_inflate", format!("{:?}", join)), |b| {
            let options = OffsetOptions::default();
            b.iter(|| inflate_paths(&subject, 250.0, join, EndType::Polygon, &options).unwrap())
        });
    }

    group.finish();
}

fn rect_clip_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("rect_clip");
    let rect = Rect64::new(-5_000, -5_000, 5_000, 5_000);
    for &i in &[100, 1000, 10000] {
        let subject = [star(i, 10_000.0, 4_000.0, 0.0)];
        group.bench_with_input(BenchmarkId::new("star", i), &i, |b, _| {
            b.iter(|| rect_clip(rect, &subject).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("star_via_intersect", i), &i, |b, _| {
            let clips = [rect.as_path()];
            b.iter(|| intersect(&subject, &clips, FillRule::NonZero).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, boolean_group, offset_group, rect_clip_group);
criterion_main!(benches);
