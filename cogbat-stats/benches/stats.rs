use criterion::{Criterion, black_box, criterion_group, criterion_main};

use cogbat_stats::{d_prime, linear_slope, median, standard_deviation};

/// Synthetic reaction-time series shaped like a real run: ~400 ms center,
/// slow drift, deterministic jitter.
fn reaction_times(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 400.0 + (i as f64) * 0.2 + ((i * 37) % 83) as f64)
        .collect()
}

pub fn bench_descriptives(c: &mut Criterion) {
    let mut group = c.benchmark_group("descriptives");
    for &n in &[50usize, 500] {
        let series = reaction_times(n);
        group.bench_function(format!("median_{n}"), |b| {
            b.iter(|| median(black_box(&series)));
        });
        group.bench_function(format!("sd_{n}"), |b| {
            b.iter(|| standard_deviation(black_box(&series)));
        });
        group.bench_function(format!("slope_{n}"), |b| {
            b.iter(|| linear_slope(black_box(&series)));
        });
    }
    group.finish();
}

pub fn bench_signal_detection(c: &mut Criterion) {
    c.bench_function("d_prime", |b| {
        b.iter(|| d_prime(black_box(42), 60, black_box(3), 20));
    });
}

criterion_group!(benches, bench_descriptives, bench_signal_detection);
criterion_main!(benches);
