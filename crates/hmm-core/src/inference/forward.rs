//! Forward pass: `log_alpha[t][j] = log P(y_0..y_t, state_t = j)`.

use super::emission::{emission_table, validate_observations};
use super::lse_states;
use super::table::LogTable;
use crate::error::Result;
use crate::model::Theta;

/// Forward log-probabilities for `observations` under `theta`.
pub fn forward(observations: &[f64], theta: &Theta) -> Result<LogTable> {
    validate_observations(observations)?;
    theta.validate()?;
    let emissions = emission_table(observations, theta)?;
    Ok(forward_with_emissions(theta, &emissions))
}

/// Forward recursion over a precomputed emission table.
///
/// Rows depend on their predecessor and are filled in increasing `t`; the
/// states inside a row are independent.
pub(crate) fn forward_with_emissions(theta: &Theta, emissions: &LogTable) -> LogTable {
    let n = emissions.rows();
    let s = theta.n_states();
    let log_a = theta.log_transition();
    let mut alpha = LogTable::filled(n, s, f64::NEG_INFINITY);
    if n == 0 {
        return alpha;
    }

    for i in 0..s {
        alpha.set(0, i, theta.log_initial()[i] + emissions.get(0, i));
    }

    for t in 1..n {
        for j in 0..s {
            let inbound = lse_states((0..s).map(|i| alpha.get(t - 1, i) + log_a[i][j]));
            alpha.set(t, j, emissions.get(t, j) + inbound);
        }
    }
    alpha
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::emission::log_density;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn theta() -> Theta {
        Theta::from_probabilities(
            &[0.6, 0.4],
            &[vec![0.7, 0.3], vec![0.2, 0.8]],
            vec![0.0, 4.0],
            vec![1.0, 1.5],
        )
        .unwrap()
    }

    #[test]
    fn test_base_case() {
        let theta = theta();
        let alpha = forward(&[0.3], &theta).unwrap();
        assert_eq!(alpha.rows(), 1);
        let expected = 0.6_f64.ln() + log_density(0.3, 0.0, 1.0).unwrap();
        assert!(approx_eq(alpha.get(0, 0), expected, 1e-12));
    }

    #[test]
    fn test_matches_linear_space_recursion() {
        let theta = theta();
        let ys = [0.3, 3.8, 4.4, -0.2];
        let alpha = forward(&ys, &theta).unwrap();

        let pdf = |y: f64, j: usize| log_density(y, theta.mean()[j], theta.stddev()[j]).unwrap().exp();
        let a = theta.transition_probabilities();
        let mut linear = vec![0.6 * pdf(ys[0], 0), 0.4 * pdf(ys[0], 1)];
        for &y in &ys[1..] {
            linear = (0..2)
                .map(|j| pdf(y, j) * (0..2).map(|i| linear[i] * a[i][j]).sum::<f64>())
                .collect();
        }
        for (j, expected) in linear.iter().enumerate() {
            assert!(approx_eq(alpha.get(3, j), expected.ln(), 1e-10));
        }
    }

    #[test]
    fn test_zero_initial_probability_stays_impossible() {
        let theta = Theta::from_probabilities(
            &[1.0, 0.0],
            &[vec![1.0, 0.0], vec![0.5, 0.5]],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
        )
        .unwrap();
        let alpha = forward(&[0.0, 1.0, 2.0], &theta).unwrap();
        for t in 0..3 {
            assert_eq!(alpha.get(t, 1), f64::NEG_INFINITY);
            assert!(alpha.get(t, 0).is_finite());
        }
    }

    #[test]
    fn test_long_sequence_does_not_underflow() {
        let theta = theta();
        let ys: Vec<f64> = (0..5_000).map(|t| if t % 7 < 3 { 0.1 } else { 4.2 }).collect();
        let alpha = forward(&ys, &theta).unwrap();
        assert!(alpha.row(ys.len() - 1).iter().all(|v| v.is_finite()));
    }
}
