//! State and transition posteriors (the E-step).

use hmm_math::log_sum_exp;

use super::backward::backward_with_emissions;
use super::emission::{emission_table, validate_observations};
use super::forward::forward_with_emissions;
use super::table::{LogTable, PairTable};
use crate::error::{EstimateError, Result};
use crate::model::Theta;

/// Posterior tables for one parameter set.
#[derive(Debug, Clone)]
pub struct Posteriors {
    log_r: LogTable,
    log_xi: PairTable,
    log_evidence: Vec<f64>,
}

impl Posteriors {
    /// `log_r[t][i]` = log P(state_t = i | y).
    pub fn log_r(&self) -> &LogTable {
        &self.log_r
    }

    /// `log_xi[t][i][j]` = log P(state_t = i, state_{t+1} = j | y).
    pub fn log_xi(&self) -> &PairTable {
        &self.log_xi
    }

    /// Per-time normalizers `lse_i(log_alpha[t][i] + log_beta[t][i])`.
    ///
    /// Each entry is the same sequence log-likelihood computed from a
    /// different time slice; they agree up to rounding.
    pub fn log_evidence(&self) -> &[f64] {
        &self.log_evidence
    }

    /// Sequence log-likelihood `log P(y | theta)`.
    pub fn log_likelihood(&self) -> f64 {
        self.log_evidence
            .last()
            .copied()
            .unwrap_or(f64::NEG_INFINITY)
    }

    /// Largest absolute disagreement between per-time normalizers.
    pub fn evidence_spread(&self) -> f64 {
        let (lo, hi) = self
            .log_evidence
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if self.log_evidence.is_empty() {
            0.0
        } else {
            hi - lo
        }
    }
}

/// Everything one E-step produces.
#[derive(Debug, Clone)]
pub struct EStep {
    pub log_alpha: LogTable,
    pub log_beta: LogTable,
    pub posteriors: Posteriors,
}

/// Normalize forward/backward tables into posteriors.
///
/// Fails with [`EstimateError::DegenerateNormalization`] at the first time
/// step whose normalizer is `-inf`.
pub(crate) fn compute_posteriors(
    alpha: &LogTable,
    beta: &LogTable,
    emissions: &LogTable,
    theta: &Theta,
) -> Result<Posteriors> {
    let n = alpha.rows();
    let s = theta.n_states();
    let log_a = theta.log_transition();

    let mut log_r = LogTable::filled(n, s, f64::NEG_INFINITY);
    let mut log_evidence = Vec::with_capacity(n);
    for t in 0..n {
        let evidence = normalizer(t, (0..s).map(|i| alpha.get(t, i) + beta.get(t, i)))?;
        for i in 0..s {
            log_r.set(t, i, alpha.get(t, i) + beta.get(t, i) - evidence);
        }
        log_evidence.push(evidence);
    }

    let steps = n.saturating_sub(1);
    let mut log_xi = PairTable::filled(steps, s, f64::NEG_INFINITY);
    let mut raw = vec![f64::NEG_INFINITY; s * s];
    for t in 0..steps {
        for i in 0..s {
            for j in 0..s {
                raw[i * s + j] =
                    alpha.get(t, i) + log_a[i][j] + beta.get(t + 1, j) + emissions.get(t + 1, j);
            }
        }
        let total = normalizer(t, raw.iter().copied())?;
        for i in 0..s {
            for j in 0..s {
                log_xi.set(t, i, j, raw[i * s + j] - total);
            }
        }
    }

    Ok(Posteriors {
        log_r,
        log_xi,
        log_evidence,
    })
}

fn normalizer(time: usize, values: impl Iterator<Item = f64>) -> Result<f64> {
    match log_sum_exp(values) {
        Some(v) if v > f64::NEG_INFINITY => Ok(v),
        _ => Err(EstimateError::DegenerateNormalization { time }),
    }
}

/// Run the forward and backward passes and normalize them.
pub fn e_step(observations: &[f64], theta: &Theta) -> Result<EStep> {
    validate_observations(observations)?;
    theta.validate()?;
    let emissions = emission_table(observations, theta)?;
    e_step_with_emissions(theta, &emissions)
}

pub(crate) fn e_step_with_emissions(theta: &Theta, emissions: &LogTable) -> Result<EStep> {
    let log_alpha = forward_with_emissions(theta, emissions);
    let log_beta = backward_with_emissions(theta, emissions);
    let posteriors = compute_posteriors(&log_alpha, &log_beta, emissions, theta)?;
    Ok(EStep {
        log_alpha,
        log_beta,
        posteriors,
    })
}

/// Posteriors for `observations` under `theta`.
pub fn posteriors(observations: &[f64], theta: &Theta) -> Result<Posteriors> {
    Ok(e_step(observations, theta)?.posteriors)
}

/// Sequence log-likelihood `log P(y | theta)` from the forward pass alone.
///
/// Returns `-inf` rather than an error when the sequence is impossible under
/// `theta`.
pub fn log_likelihood(observations: &[f64], theta: &Theta) -> Result<f64> {
    validate_observations(observations)?;
    theta.validate()?;
    let emissions = emission_table(observations, theta)?;
    let alpha = forward_with_emissions(theta, &emissions);
    Ok(log_sum_exp(alpha.row(alpha.rows() - 1).iter().copied()).unwrap_or(f64::NEG_INFINITY))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn theta() -> Theta {
        Theta::from_probabilities(
            &[0.5, 0.5],
            &[vec![0.9, 0.1], vec![0.1, 0.9]],
            vec![1.0, 9.0],
            vec![1.0, 1.0],
        )
        .unwrap()
    }

    const OBS: [f64; 6] = [0.2, -0.1, 9.8, 10.3, 0.0, 9.9];

    #[test]
    fn test_responsibilities_normalized() {
        let post = posteriors(&OBS, &theta()).unwrap();
        for t in 0..OBS.len() {
            let total: f64 = post.log_r().row(t).iter().map(|v| v.exp()).sum();
            assert!(approx_eq(total, 1.0, 1e-9), "t={t} total={total}");
        }
    }

    #[test]
    fn test_pair_posteriors_normalized() {
        let post = posteriors(&OBS, &theta()).unwrap();
        assert_eq!(post.log_xi().steps(), OBS.len() - 1);
        for t in 0..post.log_xi().steps() {
            let total: f64 = post.log_xi().slice(t).iter().map(|v| v.exp()).sum();
            assert!(approx_eq(total, 1.0, 1e-9), "t={t} total={total}");
        }
    }

    #[test]
    fn test_pair_marginal_matches_responsibility() {
        // sum_j xi[t][i][j] == r[t][i]
        let post = posteriors(&OBS, &theta()).unwrap();
        for t in 0..OBS.len() - 1 {
            for i in 0..2 {
                let marginal: f64 = (0..2).map(|j| post.log_xi().get(t, i, j).exp()).sum();
                assert!(approx_eq(marginal, post.log_r().get(t, i).exp(), 1e-9));
            }
        }
    }

    #[test]
    fn test_evidence_is_time_invariant() {
        let post = posteriors(&OBS, &theta()).unwrap();
        assert_eq!(post.log_evidence().len(), OBS.len());
        assert!(post.evidence_spread() < 1e-9);
        let direct = log_likelihood(&OBS, &theta()).unwrap();
        assert!(approx_eq(post.log_likelihood(), direct, 1e-9));
    }

    #[test]
    fn test_responsibilities_follow_data() {
        let post = posteriors(&OBS, &theta()).unwrap();
        assert!(post.log_r().get(0, 0).exp() > 0.99);
        assert!(post.log_r().get(2, 1).exp() > 0.99);
    }

    #[test]
    fn test_single_observation_has_empty_pairs() {
        let step = e_step(&[0.5], &theta()).unwrap();
        assert_eq!(step.log_alpha.rows(), 1);
        assert_eq!(step.log_beta.row(0), &[0.0, 0.0]);
        assert!(step.posteriors.log_xi().is_empty());
        let total: f64 = step.posteriors.log_r().row(0).iter().map(|v| v.exp()).sum();
        assert!(approx_eq(total, 1.0, 1e-12));
    }

    #[test]
    fn test_impossible_sequence_is_degenerate() {
        // No state carries initial mass.
        let theta = Theta::new(
            vec![f64::NEG_INFINITY, f64::NEG_INFINITY],
            vec![vec![0.0, f64::NEG_INFINITY], vec![f64::NEG_INFINITY, 0.0]],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
        )
        .unwrap();
        let err = posteriors(&[0.0, 1.0], &theta).unwrap_err();
        assert_eq!(err, EstimateError::DegenerateNormalization { time: 0 });
        assert_eq!(log_likelihood(&[0.0, 1.0], &theta).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_rejects_empty_observations() {
        let err = posteriors(&[], &theta()).unwrap_err();
        assert!(matches!(err, EstimateError::InvalidDimension(_)));
    }
}
