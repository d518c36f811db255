use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use exprfold::dsl::*;
use exprfold::Program;
use exprfold_tests::programs::{e_approx, fib_recursive, sequence_sum_generator, sequence_sum_reduce};
use pprof::criterion::{Output, PProfProfiler};

fn bench_eval(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("evaluate program");

    let fib = fib_recursive();
    for n in [10.0, 15.0] {
        group.bench_with_input(BenchmarkId::new("fib recursive", n), &n, |b, n| {
            b.iter(|| fib.run(&[*n]))
        });
    }

    let reduce = sequence_sum_reduce();
    let generator = sequence_sum_generator();
    for n in [100.0, 1000.0] {
        group.bench_with_input(BenchmarkId::new("sum via reduce_range", n), &n, |b, n| {
            b.iter(|| reduce.run(&[*n]))
        });
        group.bench_with_input(BenchmarkId::new("sum via generator", n), &n, |b, n| {
            b.iter(|| generator.run(&[*n]))
        });
    }

    let e = e_approx();
    group.bench_with_input(BenchmarkId::new("e approximation", 20), &20.0, |b, n| {
        b.iter(|| e.run(&[*n]))
    });

    group.finish();
}

fn bench_validate(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("validate program");

    // wide and shallow, then a long chain of unary nodes
    for width in [64, 1024] {
        let body = add((0..width).map(|i| mul([var(i % 2), value(i as f64)])));
        group.bench_with_input(BenchmarkId::new("wide add", width), &body, |b, body| {
            b.iter(|| Program::new(body.clone(), 2))
        });
    }
    for depth in [64, 1024] {
        let body = (0..depth).fold(var(0), |acc, _| neg(acc));
        group.bench_with_input(BenchmarkId::new("neg chain", depth), &body, |b, body| {
            b.iter(|| Program::new(body.clone(), 1))
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .with_profiler(
            PProfProfiler::new(100, Output::Flamegraph(None))
        );
    targets = bench_eval, bench_validate
}
criterion_main!(benches);
