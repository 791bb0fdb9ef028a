//! Parameter set of a Gaussian HMM.
//!
//! [`Theta`] is an immutable value: every EM iteration builds a new one and
//! the caller's initial guess is never touched.

use hmm_math::exp_all;
use serde::{Deserialize, Serialize};

use crate::error::{EstimateError, Result};

/// Log-space parameters of an `S`-state HMM with univariate Gaussian emissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theta {
    /// `log_initial[i]` = log P(state_0 = i).
    #[serde(with = "log_values")]
    log_initial: Vec<f64>,
    /// `log_transition[i][j]` = log P(state_{t+1} = j | state_t = i).
    #[serde(with = "log_matrix")]
    log_transition: Vec<Vec<f64>>,
    /// Per-state emission mean.
    mean: Vec<f64>,
    /// Per-state emission standard deviation.
    stddev: Vec<f64>,
}

impl Theta {
    /// Build a parameter set from log-space values.
    ///
    /// Only shapes are checked; statistical plausibility is the caller's concern.
    pub fn new(
        log_initial: Vec<f64>,
        log_transition: Vec<Vec<f64>>,
        mean: Vec<f64>,
        stddev: Vec<f64>,
    ) -> Result<Self> {
        let theta = Theta {
            log_initial,
            log_transition,
            mean,
            stddev,
        };
        theta.validate()?;
        Ok(theta)
    }

    /// Build a parameter set from linear-space probabilities.
    pub fn from_probabilities(
        initial: &[f64],
        transition: &[Vec<f64>],
        mean: Vec<f64>,
        stddev: Vec<f64>,
    ) -> Result<Self> {
        Self::new(
            initial.iter().map(|p| p.ln()).collect(),
            transition
                .iter()
                .map(|row| row.iter().map(|p| p.ln()).collect())
                .collect(),
            mean,
            stddev,
        )
    }

    /// Check that all four fields agree on the number of states.
    pub fn validate(&self) -> Result<()> {
        let s = self.log_initial.len();
        if s == 0 {
            return Err(EstimateError::InvalidDimension(
                "model has no states".to_string(),
            ));
        }
        if self.log_transition.len() != s {
            return Err(EstimateError::InvalidDimension(format!(
                "transition matrix has {} rows, expected {}",
                self.log_transition.len(),
                s
            )));
        }
        for (i, row) in self.log_transition.iter().enumerate() {
            if row.len() != s {
                return Err(EstimateError::InvalidDimension(format!(
                    "transition row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    s
                )));
            }
        }
        if self.mean.len() != s {
            return Err(EstimateError::InvalidDimension(format!(
                "mean has {} entries, expected {}",
                self.mean.len(),
                s
            )));
        }
        if self.stddev.len() != s {
            return Err(EstimateError::InvalidDimension(format!(
                "stddev has {} entries, expected {}",
                self.stddev.len(),
                s
            )));
        }
        Ok(())
    }

    /// Number of hidden states.
    pub fn n_states(&self) -> usize {
        self.log_initial.len()
    }

    pub fn log_initial(&self) -> &[f64] {
        &self.log_initial
    }

    pub fn log_transition(&self) -> &[Vec<f64>] {
        &self.log_transition
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn stddev(&self) -> &[f64] {
        &self.stddev
    }

    /// Initial distribution in linear space.
    pub fn initial_probabilities(&self) -> Vec<f64> {
        exp_all(&self.log_initial)
    }

    /// Transition matrix in linear space.
    pub fn transition_probabilities(&self) -> Vec<Vec<f64>> {
        self.log_transition.iter().map(|row| exp_all(row)).collect()
    }

    /// Load a model from JSON, rejecting inconsistent shapes.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let theta: Theta = serde_json::from_str(json)?;
        theta.validate().map_err(serde::de::Error::custom)?;
        Ok(theta)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// JSON has no `-inf`; zero probabilities travel as `null`.
mod log_values {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn encode(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|v| v.is_finite().then_some(*v)).collect()
    }

    pub fn decode(values: Vec<Option<f64>>) -> Vec<f64> {
        values
            .into_iter()
            .map(|v| v.unwrap_or(f64::NEG_INFINITY))
            .collect()
    }

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        encode(values).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Ok(decode(Vec::<Option<f64>>::deserialize(deserializer)?))
    }
}

mod log_matrix {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::log_values::{decode, encode};

    pub fn serialize<S: Serializer>(rows: &[Vec<f64>], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded: Vec<Vec<Option<f64>>> = rows.iter().map(|row| encode(row)).collect();
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<f64>>, D::Error> {
        let encoded = Vec::<Vec<Option<f64>>>::deserialize(deserializer)?;
        Ok(encoded.into_iter().map(decode).collect())
    }
}
