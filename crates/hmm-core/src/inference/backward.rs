//! Backward pass: `log_beta[t][i] = log P(y_{t+1}..y_{N-1} | state_t = i)`.

use super::emission::{emission_table, validate_observations};
use super::lse_states;
use super::table::LogTable;
use crate::error::Result;
use crate::model::Theta;

/// Backward log-probabilities for `observations` under `theta`.
pub fn backward(observations: &[f64], theta: &Theta) -> Result<LogTable> {
    validate_observations(observations)?;
    theta.validate()?;
    let emissions = emission_table(observations, theta)?;
    Ok(backward_with_emissions(theta, &emissions))
}

/// Backward recursion over a precomputed emission table, filled in decreasing `t`.
pub(crate) fn backward_with_emissions(theta: &Theta, emissions: &LogTable) -> LogTable {
    let n = emissions.rows();
    let s = theta.n_states();
    let log_a = theta.log_transition();
    // Last row is log(1) for every state.
    let mut beta = LogTable::filled(n, s, 0.0);

    for t in (0..n.saturating_sub(1)).rev() {
        for i in 0..s {
            let outbound = lse_states(
                (0..s).map(|j| beta.get(t + 1, j) + log_a[i][j] + emissions.get(t + 1, j)),
            );
            beta.set(t, i, outbound);
        }
    }
    beta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::forward::forward;
    use hmm_math::log_sum_exp;

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
    fn test_last_row_is_zero() {
        let beta = backward(&[0.1, 2.0, 3.9], &theta()).unwrap();
        assert_eq!(beta.row(2), &[0.0, 0.0]);
    }

    #[test]
    fn test_single_observation() {
        let beta = backward(&[1.0], &theta()).unwrap();
        assert_eq!(beta.rows(), 1);
        assert_eq!(beta.row(0), &[0.0, 0.0]);
    }

    #[test]
    fn test_agrees_with_forward_likelihood() {
        // P(y) = sum_i pi_i * b_i(y_0) * beta_0(i) = sum_i alpha_{N-1}(i)
        let theta = theta();
        let ys = [0.1, 2.0, 3.9, 4.4, -0.3];
        let alpha = forward(&ys, &theta).unwrap();
        let beta = backward(&ys, &theta).unwrap();
        let from_forward = log_sum_exp(alpha.row(ys.len() - 1).iter().copied()).unwrap();
        let from_backward =
            log_sum_exp((0..2).map(|i| alpha.get(0, i) + beta.get(0, i))).unwrap();
        assert!((from_forward - from_backward).abs() < 1e-10);
    }
}
