use rand_distr::LogNormal;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Seed for the random generators of the current scenario run
pub static RAND_SEED: AtomicU64 = AtomicU64::new(0);

/// When set, per-round agent decisions are written to their own log files
pub static VERBOSE_ROUNDS: AtomicBool = AtomicBool::new(false);

/// Number of scenario runs performed by this process
pub static TOTAL_SCENARIO_RUNS: AtomicU64 = AtomicU64::new(0);

/// Derive a seed for one random stream of the current run.
/// Different `stream` values give independent generators for the same `RAND_SEED`.
pub fn get_seed(stream: u64) -> u64 {
    RAND_SEED
        .load(Ordering::Relaxed)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(stream)
}

/// Log-normal distribution with the given mean and standard deviation (both in linear space)
///
/// For LogNormal(μ, σ): E[X] = exp(μ + σ²/2), Var[X] = (exp(σ²) - 1) * exp(2μ + σ²),
/// so σ² = ln(1 + s²/m²) and μ = ln(m) - σ²/2.
pub fn lognormal_dist(mean: f64, stddev: f64) -> LogNormal<f64> {
    assert!(mean > 0.0, "lognormal_dist requires a positive mean, got {}", mean);
    let sigma_squared = (1.0 + (stddev * stddev) / (mean * mean)).ln();
    let mu = mean.ln() - sigma_squared / 2.0;
    LogNormal::new(mu, sigma_squared.sqrt()).expect("sigma is finite and non-negative")
}

/// Index of the largest element, first occurrence on ties.
/// NaN never wins against a number. Returns None for an empty slice.
pub fn argmax_index(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            None => best = Some(i),
            Some(b) => {
                if v > values[b] || (values[b].is_nan() && !v.is_nan()) {
                    best = Some(i);
                }
            }
        }
    }
    best
}
