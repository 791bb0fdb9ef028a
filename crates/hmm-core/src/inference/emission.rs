//! Gaussian emission log-densities.

use hmm_math::normal_log_pdf;

use super::table::LogTable;
use crate::error::{EstimateError, Result};
use crate::model::Theta;

/// Log of the normal density `N(y; mu, sigma)`.
///
/// Fails with [`EstimateError::InvalidParameter`] when `sigma` is not a
/// positive finite number.
pub fn log_density(y: f64, mu: f64, sigma: f64) -> Result<f64> {
    check_sigma("sigma", sigma)?;
    Ok(normal_log_pdf(y, mu, sigma))
}

fn check_sigma(name: &str, sigma: f64) -> Result<()> {
    if sigma > 0.0 && sigma.is_finite() {
        Ok(())
    } else {
        Err(EstimateError::InvalidParameter {
            name: name.to_string(),
            value: sigma,
        })
    }
}

/// Reject an empty sequence or any non-finite value.
pub fn validate_observations(observations: &[f64]) -> Result<()> {
    if observations.is_empty() {
        return Err(EstimateError::InvalidDimension(
            "observation sequence is empty".to_string(),
        ));
    }
    if let Some((index, &value)) = observations
        .iter()
        .enumerate()
        .find(|(_, y)| !y.is_finite())
    {
        return Err(EstimateError::NonFiniteObservation { index, value });
    }
    Ok(())
}

/// `N × S` table of `log N(y_t; mean[j], stddev[j])`.
///
/// Every E-step quantity reads emissions from this table, so each density is
/// evaluated once per iteration.
pub fn emission_table(observations: &[f64], theta: &Theta) -> Result<LogTable> {
    let s = theta.n_states();
    for (j, &sigma) in theta.stddev().iter().enumerate() {
        check_sigma(&format!("stddev[{}]", j), sigma)?;
    }

    let mut table = LogTable::filled(observations.len(), s, 0.0);
    for (t, &y) in observations.iter().enumerate() {
        for j in 0..s {
            table.set(t, j, normal_log_pdf(y, theta.mean()[j], theta.stddev()[j]));
        }
    }
    Ok(table)
}
