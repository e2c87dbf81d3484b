//! Descriptive and signal-detection statistics for trial outcomes.
//!
//! Pure functions over finite numeric slices; every paradigm's summary
//! computation is built from these. Sensitivity and bias use the log-linear
//! rate correction so ceiling and floor performance stay finite.
//!
//! # References
//!
//! Hautus, M. J. (1995). Corrections for extreme proportions and their
//! biasing effects on estimated values of d'. Behavior Research Methods 27.
//!
//! Acklam, P. J. (2003). An algorithm for computing the inverse normal
//! cumulative distribution function.

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median; 0 for an empty slice. Averages the middle pair for even lengths.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Sample standard deviation (Bessel-corrected, divisor n-1); 0 for n < 2.
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Proportion correct; 0 for an empty run.
pub fn accuracy(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64
}

fn corrected_rate(count: usize, total: usize) -> f64 {
    // Log-linear (Hautus) correction: keeps the inverse normal defined at
    // rates of exactly 0 or 1.
    (count as f64 + 0.5) / (total as f64 + 1.0)
}

/// Signal-detection sensitivity d': separation between signal and noise
/// distributions in standard-deviation units.
pub fn d_prime(hits: usize, total_signal: usize, false_alarms: usize, total_noise: usize) -> f64 {
    let hit_rate = corrected_rate(hits, total_signal);
    let fa_rate = corrected_rate(false_alarms, total_noise);
    inverse_normal_cdf(hit_rate) - inverse_normal_cdf(fa_rate)
}

/// Response bias (criterion c): positive values indicate conservative
/// responding.
pub fn response_bias(
    hits: usize,
    total_signal: usize,
    false_alarms: usize,
    total_noise: usize,
) -> f64 {
    let hit_rate = corrected_rate(hits, total_signal);
    let fa_rate = corrected_rate(false_alarms, total_noise);
    -0.5 * (inverse_normal_cdf(hit_rate) + inverse_normal_cdf(fa_rate))
}

// Beasley-Springer-Moro / Acklam rational-polynomial coefficients.
const A: [f64; 6] = [
    -3.969683028665376e1,
    2.209460984245205e2,
    -2.759285104469687e2,
    1.383577518672690e2,
    -3.066479806614716e1,
    2.506628277459239e0,
];
const B: [f64; 5] = [
    -5.447609879822406e1,
    1.615858368580409e2,
    -1.556989798598866e2,
    6.680131188771972e1,
    -1.328068155288572e1,
];
const C: [f64; 6] = [
    -7.784894002430293e-3,
    -3.223964580411365e-1,
    -2.400758277161838e0,
    -2.549732539343734e0,
    4.374664141464968e0,
    2.938163982698783e0,
];
const D: [f64; 4] = [
    7.784695709041462e-3,
    3.224671290700398e-1,
    2.445134137142996e0,
    3.754408661907416e0,
];

const P_LOW: f64 = 0.02425;

/// Inverse standard normal CDF, accurate to ~1.15e-9 absolute error on the
/// open unit interval. Three rational-polynomial pieces split at
/// `p = 0.02425` and `p = 0.97575`.
pub fn inverse_normal_cdf(p: f64) -> f64 {
    debug_assert!(p > 0.0 && p < 1.0, "p must be in the open unit interval");
    let p_high = 1.0 - P_LOW;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= p_high {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -((((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0))
    }
}

/// Ordinary least-squares slope of `series[i]` against `i + 1`, for
/// learning-curve quantification. 0 for series shorter than 2.
pub fn linear_slope(series: &[f64]) -> f64 {
    let n = series.len();
    if n < 2 {
        return 0.0;
    }
    let n_f = n as f64;
    let mean_x = (n_f + 1.0) / 2.0;
    let mean_y = mean(series);
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &y) in series.iter().enumerate() {
        let dx = (i + 1) as f64 - mean_x;
        num += dx * (y - mean_y);
        den += dx * dx;
    }
    num / den
}
