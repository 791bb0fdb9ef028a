//! Error types for Gaussian HMM estimation.
//!
//! Every failure aborts the fit and propagates to the caller of
//! [`crate::em::estimate`]; nothing is retried or recovered internally.

use thiserror::Error;

/// Result type alias for estimation operations.
pub type Result<T> = std::result::Result<T, EstimateError>;

/// Estimation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    /// Mismatched parameter shapes or an empty observation sequence.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// A parameter outside its domain (non-positive standard deviation, zero iterations).
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: String, value: f64 },

    /// An observation that is NaN or infinite.
    #[error("Non-finite observation at index {index}: {value}")]
    NonFiniteObservation { index: usize, value: f64 },

    /// All posterior mass at time `time` collapsed to zero.
    #[error("Degenerate normalization at t={time}: sequence has zero probability under the current parameters")]
    DegenerateNormalization { time: usize },

    /// A state received zero total responsibility in the M-step.
    #[error("Degenerate state {state}: zero total responsibility")]
    DegenerateState { state: usize },
}

impl EstimateError {
    /// Stable error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            EstimateError::InvalidDimension(_) => 70,
            EstimateError::InvalidParameter { .. } => 71,
            EstimateError::NonFiniteObservation { .. } => 72,
            EstimateError::DegenerateNormalization { .. } => 73,
            EstimateError::DegenerateState { .. } => 74,
        }
    }

    /// Whether the error comes from the caller's input rather than from the
    /// parameter trajectory during iteration.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EstimateError::InvalidDimension(_)
                | EstimateError::InvalidParameter { .. }
                | EstimateError::NonFiniteObservation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            EstimateError::InvalidDimension("x".to_string()),
            EstimateError::InvalidParameter {
                name: "stddev[0]".to_string(),
                value: 0.0,
            },
            EstimateError::NonFiniteObservation {
                index: 3,
                value: f64::NAN,
            },
            EstimateError::DegenerateNormalization { time: 1 },
            EstimateError::DegenerateState { state: 0 },
        ];
        let mut codes: Vec<u32> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_display() {
        let err = EstimateError::InvalidParameter {
            name: "stddev[1]".to_string(),
            value: -0.5,
        };
        assert_eq!(err.to_string(), "Invalid parameter stddev[1]: -0.5");
        assert_eq!(
            EstimateError::DegenerateState { state: 2 }.to_string(),
            "Degenerate state 2: zero total responsibility"
        );
    }

    #[test]
    fn test_input_error_classification() {
        assert!(EstimateError::InvalidDimension("empty".to_string()).is_input_error());
        assert!(!EstimateError::DegenerateState { state: 0 }.is_input_error());
        assert!(!EstimateError::DegenerateNormalization { time: 0 }.is_input_error());
    }
}
