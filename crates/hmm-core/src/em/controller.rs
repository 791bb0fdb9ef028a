//! Iteration control for Baum-Welch.

use hmm_config::{FitConfig, VarianceUpdate};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::mstep::m_step;
use crate::error::{EstimateError, Result};
use crate::inference::emission::{emission_table, validate_observations};
use crate::inference::log_likelihood;
use crate::inference::posterior::e_step_with_emissions;
use crate::model::Theta;

/// Relative slack before a log-likelihood drop is reported.
const DECREASE_SLACK: f64 = 1e-9;

/// Outcome of a fit.
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    /// Final parameters.
    pub theta: Theta,
    /// Number of M-steps applied.
    pub iterations: usize,
    /// `log_likelihood_trace[k]` is the log-likelihood of the parameters
    /// entering iteration `k`.
    pub log_likelihood_trace: Vec<f64>,
    /// Log-likelihood of `theta`, when it can be evaluated.
    pub final_log_likelihood: Option<f64>,
    /// Whether the convergence tolerance stopped the fit early.
    pub converged: bool,
}

/// Baum-Welch estimator driven by a [`FitConfig`].
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    config: FitConfig,
}

impl Estimator {
    pub fn new(config: FitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Run EM from `initial`, which is left untouched.
    ///
    /// Without a convergence tolerance exactly `max_iter` updates are
    /// applied. With one, the fit stops before the update whose incoming
    /// log-likelihood changed by less than the tolerance.
    #[instrument(
        level = "debug",
        skip_all,
        fields(states = initial.n_states(), observations = observations.len())
    )]
    pub fn fit(&self, observations: &[f64], initial: &Theta) -> Result<FitReport> {
        validate_observations(observations)?;
        initial.validate()?;
        let max_iter = self.config.max_iter;
        if max_iter == 0 {
            return Err(EstimateError::InvalidParameter {
                name: "max_iter".to_string(),
                value: 0.0,
            });
        }
        let tolerance = self.tolerance()?;
        let variance_update = self.config.variance_update;

        info!(
            states = initial.n_states(),
            observations = observations.len(),
            max_iter,
            variance_update = %variance_update,
            tolerance = ?tolerance,
            "Starting Baum-Welch fit"
        );
        if observations.len() == 1 {
            warn!("single observation: transition matrix will not be re-estimated");
        }

        let mut theta = initial.clone();
        let mut trace: Vec<f64> = Vec::with_capacity(max_iter);
        let mut iterations = 0;
        let mut converged = false;

        for iteration in 0..max_iter {
            let emissions = emission_table(observations, &theta)?;
            let step = e_step_with_emissions(&theta, &emissions)?;
            let ll = step.posteriors.log_likelihood();
            debug!(iteration, log_likelihood = ll, "E-step complete");

            if let Some(&previous) = trace.last() {
                if ll < previous - DECREASE_SLACK * previous.abs().max(1.0) {
                    warn!(
                        iteration,
                        previous,
                        current = ll,
                        variance_update = %variance_update,
                        "log-likelihood decreased"
                    );
                }
                if let Some(tol) = tolerance {
                    if (ll - previous).abs() < tol {
                        trace.push(ll);
                        converged = true;
                        debug!(iteration, change = (ll - previous).abs(), "converged");
                        break;
                    }
                }
            }
            trace.push(ll);

            theta = m_step(observations, &step.posteriors, &theta, variance_update)?;
            iterations += 1;
        }

        let final_log_likelihood = if converged {
            trace.last().copied()
        } else {
            log_likelihood(observations, &theta).ok()
        };

        info!(
            iterations,
            converged,
            log_likelihood = ?final_log_likelihood,
            "Baum-Welch fit complete"
        );

        Ok(FitReport {
            theta,
            iterations,
            log_likelihood_trace: trace,
            final_log_likelihood,
            converged,
        })
    }

    fn tolerance(&self) -> Result<Option<f64>> {
        match &self.config.convergence {
            None => Ok(None),
            Some(c) if c.tolerance > 0.0 && c.tolerance.is_finite() => Ok(Some(c.tolerance)),
            Some(c) => Err(EstimateError::InvalidParameter {
                name: "tolerance".to_string(),
                value: c.tolerance,
            }),
        }
    }
}

/// Fit with the stale-mean variance update and a fixed iteration count.
///
/// Returns a new parameter set of the same shape as `initial`.
pub fn estimate(observations: &[f64], initial: &Theta, max_iter: usize) -> Result<Theta> {
    let config = FitConfig::default()
        .with_max_iter(max_iter)
        .with_variance_update(VarianceUpdate::PreviousMean);
    Ok(Estimator::new(config).fit(observations, initial)?.theta)
}
