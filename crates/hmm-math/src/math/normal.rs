//! Univariate normal (Gaussian) density in log space.
//!
//! The density is: `f(y) = 1 / (σ √(2π)) * exp(-(y - μ)² / (2σ²))`

/// 0.5 * ln(2π)
pub const LOG_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

/// Log of the normal PDF at `y`.
///
/// # Arguments
/// * `y` - The value at which to evaluate
/// * `mu` - Mean
/// * `sigma` - Standard deviation (σ > 0)
///
/// # Returns
/// * `log N(y | μ, σ)`, or NaN when σ is not a positive finite number
pub fn normal_log_pdf(y: f64, mu: f64, sigma: f64) -> f64 {
    if y.is_nan() || mu.is_nan() || sigma.is_nan() {
        return f64::NAN;
    }
    if sigma <= 0.0 || sigma.is_infinite() {
        return f64::NAN;
    }
    let z = (y - mu) / sigma;
    -0.5 * z * z - sigma.ln() - LOG_SQRT_2PI
}

/// Normal PDF at `y`.
pub fn normal_pdf(y: f64, mu: f64, sigma: f64) -> f64 {
    let log_pdf = normal_log_pdf(y, mu, sigma);
    if log_pdf.is_nan() {
        return f64::NAN;
    }
    log_pdf.exp()
}
