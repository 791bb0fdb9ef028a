//! Numerically stable primitives for log-domain probability math.

use std::f64::consts::LN_2;

/// `ln(f64::EPSILON / 2)`: below this gap the smaller term cannot change the sum.
pub const LSE_UNDERFLOW_THRESHOLD: f64 = -53.0 * LN_2;

/// Stable log(exp(a) + exp(b)).
///
/// When the two terms are further apart than [`LSE_UNDERFLOW_THRESHOLD`] the
/// larger one is returned unchanged. `-inf` behaves as zero probability.
pub fn log_add_exp(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if a == f64::INFINITY || b == f64::INFINITY {
        return f64::INFINITY;
    }
    let m = a.max(b);
    if m == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    let d = -(a - b).abs();
    if d < LSE_UNDERFLOW_THRESHOLD {
        return m;
    }
    m + d.exp().ln_1p()
}

/// Stable log(sum(exp(values))), folded pairwise left to right.
///
/// Returns `None` for an empty sequence; the sum of no log-values is not
/// defined here. All `-inf` inputs reduce to `-inf`.
pub fn log_sum_exp<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().reduce(log_add_exp)
}

/// Log-probabilities to linear probabilities.
pub fn exp_all(log_values: &[f64]) -> Vec<f64> {
    log_values.iter().map(|v| v.exp()).collect()
}
