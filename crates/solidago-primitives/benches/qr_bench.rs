//! Benchmarks for the QR primitives.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use solidago_primitives::{qr_quantile, qr_uncertainty, QrSample};

fn sample(n: usize) -> QrSample {
    let mut sample = QrSample::with_capacity(n);
    for i in 0..n {
        let x = ((i * 7919) % 1000) as f64 / 100.0 - 5.0;
        sample.push(x, 1.0 + (i % 3) as f64, 0.1, 0.2);
    }
    sample
}

fn bench_qr_quantile(c: &mut Criterion) {
    let s = sample(1000);
    c.bench_function("qr_quantile_1000", |b| {
        b.iter(|| qr_quantile(black_box(0.1), 0.2, black_box(&s), 0.0, 1e-5))
    });
    c.bench_function("qr_uncertainty_1000", |b| {
        b.iter(|| qr_uncertainty(black_box(0.1), black_box(&s), 1.0, 1e-5, None))
    });
}

criterion_group!(benches, bench_qr_quantile);
criterion_main!(benches);
