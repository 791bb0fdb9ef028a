//! Baum-Welch parameter estimation for hidden Markov models with univariate
//! Gaussian emissions.
//!
//! All probability-like quantities stay in log space; see
//! [`hmm_math::log_add_exp`] for the underflow discipline.
//!
//! ```ignore
//! use hmm_core::{estimate, Theta};
//!
//! let initial = Theta::from_probabilities(
//!     &[0.5, 0.5],
//!     &[vec![0.9, 0.1], vec![0.1, 0.9]],
//!     vec![1.0, 9.0],
//!     vec![1.0, 1.0],
//! )?;
//! let fitted = estimate(&[0.2, -0.1, 9.8, 10.3, 0.0, 9.9], &initial, 50)?;
//! ```

pub mod em;
pub mod error;
pub mod exit_codes;
pub mod inference;
pub mod logging;
pub mod model;
pub mod simulate;

pub use em::{estimate, m_step, Estimator, FitReport};
pub use error::{EstimateError, Result};
pub use hmm_config::{FitConfig, VarianceUpdate, DEFAULT_MAX_ITER};
pub use inference::{
    backward, e_step, forward, log_likelihood, posteriors, EStep, LogTable, PairTable,
    Posteriors,
};
pub use model::Theta;
pub use simulate::{simulate, Simulation};
