//! Benchmarks for consumer delivery and termination.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pushflow::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

fn consumer_benchmark(c: &mut Criterion) {
    let sum = Arc::new(AtomicU64::new(0));
    let total = sum.clone();
    let consumer: Consumer<u64> = Consumer::from_next(move |v| {
        total.fetch_add(v, Ordering::Relaxed);
    });

    c.bench_function("put_next", |b| {
        b.iter(|| black_box(consumer.put_next(black_box(1))))
    });

    c.bench_function("create_attach_terminate", |b| {
        b.iter(|| {
            let consumer: Consumer<u64> = Consumer::from_next(|_| {});
            let mut lifetime = Lifetime::new();
            lifetime.add(|| {});
            consumer.set_lifetime(lifetime);
            consumer.terminate();
            black_box(consumer.put_next(1))
        })
    });
}

criterion_group!(benches, consumer_benchmark);
criterion_main!(benches);
