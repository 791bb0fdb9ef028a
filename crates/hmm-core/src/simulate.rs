//! Sampling synthetic sequences from a model.
//!
//! Used to generate test data with known parameters; fitting a simulated
//! sequence should recover the generating [`Theta`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{EstimateError, Result};
use crate::model::Theta;

/// A sampled hidden path and its emissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub states: Vec<usize>,
    pub observations: Vec<f64>,
}

/// Draw `len` steps from `theta`. The same seed always yields the same sequence.
pub fn simulate(theta: &Theta, len: usize, seed: u64) -> Result<Simulation> {
    theta.validate()?;
    if len == 0 {
        return Err(EstimateError::InvalidDimension(
            "simulation length must be positive".to_string(),
        ));
    }
    for (j, &sigma) in theta.stddev().iter().enumerate() {
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(EstimateError::InvalidParameter {
                name: format!("stddev[{}]", j),
                value: sigma,
            });
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut states = Vec::with_capacity(len);
    let mut observations = Vec::with_capacity(len);

    let mut state = sample_log_categorical(&mut rng, theta.log_initial());
    for t in 0..len {
        if t > 0 {
            state = sample_log_categorical(&mut rng, &theta.log_transition()[state]);
        }
        let z = standard_normal(&mut rng);
        states.push(state);
        observations.push(theta.mean()[state] + theta.stddev()[state] * z);
    }

    Ok(Simulation {
        states,
        observations,
    })
}

/// Index drawn with probability `exp(log_probs[i])`.
///
/// Rounding can leave the cumulative sum just short of 1; the remainder goes
/// to the last index with non-zero mass.
fn sample_log_categorical<R: Rng>(rng: &mut R, log_probs: &[f64]) -> usize {
    let u: f64 = rng.random();
    let mut cumulative = 0.0;
    let mut last_possible = 0;
    for (i, &lp) in log_probs.iter().enumerate() {
        if lp == f64::NEG_INFINITY {
            continue;
        }
        cumulative += lp.exp();
        last_possible = i;
        if u < cumulative {
            return i;
        }
    }
    last_possible
}

/// Box-Muller transform.
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    // 1 - u lies in (0, 1], keeping ln finite.
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
