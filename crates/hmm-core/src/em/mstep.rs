//! Parameter re-estimation from posteriors (the M-step).
//!
//! Sums of responsibilities stay in log space; the mean and variance
//! weights are exponentiated only after subtracting each state's log total,
//! so they lie in `[0, 1]` and cannot underflow as a group.

use hmm_config::VarianceUpdate;
use hmm_math::log_sum_exp;

use crate::error::{EstimateError, Result};
use crate::inference::Posteriors;
use crate::model::Theta;

/// Build the next parameter set from `posteriors`.
///
/// `previous` supplies the centre of the variance update under
/// [`VarianceUpdate::PreviousMean`], and the transition matrix when the
/// sequence has a single observation (there are no pairs to count).
pub fn m_step(
    observations: &[f64],
    posteriors: &Posteriors,
    previous: &Theta,
    variance_update: VarianceUpdate,
) -> Result<Theta> {
    previous.validate()?;
    let log_r = posteriors.log_r();
    let log_xi = posteriors.log_xi();
    let n = log_r.rows();
    let s = previous.n_states();

    let pairs_match = log_xi.is_empty() || (log_xi.steps() + 1 == n && log_xi.states() == s);
    if n != observations.len() || log_r.cols() != s || !pairs_match {
        return Err(EstimateError::InvalidDimension(format!(
            "posteriors are {}x{}, expected {}x{}",
            n,
            log_r.cols(),
            observations.len(),
            s
        )));
    }

    let log_initial = log_r.row(0).to_vec();

    let log_transition = if log_xi.is_empty() {
        previous.log_transition().to_vec()
    } else {
        let mut rows = Vec::with_capacity(s);
        for i in 0..s {
            let departures = state_total(i, log_r.column(i).take(n - 1))?;
            rows.push(
                (0..s)
                    .map(|j| {
                        log_sum_exp(log_xi.transition_series(i, j))
                            .unwrap_or(f64::NEG_INFINITY)
                            - departures
                    })
                    .collect(),
            );
        }
        rows
    };

    let mut mean = Vec::with_capacity(s);
    let mut stddev = Vec::with_capacity(s);
    for i in 0..s {
        let total = state_total(i, log_r.column(i))?;
        let weights: Vec<f64> = log_r.column(i).map(|lr| (lr - total).exp()).collect();

        let mu: f64 = weights
            .iter()
            .zip(observations)
            .map(|(w, y)| w * y)
            .sum();
        let centre = match variance_update {
            VarianceUpdate::PreviousMean => previous.mean()[i],
            VarianceUpdate::UpdatedMean => mu,
        };
        let variance: f64 = weights
            .iter()
            .zip(observations)
            .map(|(w, y)| w * (y - centre).powi(2))
            .sum();

        mean.push(mu);
        stddev.push(variance.sqrt());
    }

    Theta::new(log_initial, log_transition, mean, stddev)
}

/// Log of a state's total responsibility; zero mass is a degenerate state.
fn state_total(state: usize, values: impl Iterator<Item = f64>) -> Result<f64> {
    match log_sum_exp(values) {
        Some(total) if total > f64::NEG_INFINITY => Ok(total),
        _ => Err(EstimateError::DegenerateState { state }),
    }
}
