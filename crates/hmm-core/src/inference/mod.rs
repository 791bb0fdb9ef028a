//! Log-space inference for Gaussian HMMs.
//!
//! The E-step runs in three stages over a shared emission table:
//! - [`forward`]: `log_alpha`, filled in increasing time order
//! - [`backward`]: `log_beta`, filled in decreasing time order
//! - [`posterior`]: `log_r` and `log_xi`, normalized per time step
//!
//! All tables are owned by the call that built them; only [`crate::Theta`]
//! outlives an iteration.

pub mod backward;
pub mod emission;
pub mod forward;
pub mod posterior;
pub mod table;

pub use backward::backward;
pub use emission::{emission_table, log_density, validate_observations};
pub use forward::forward;
pub use posterior::{e_step, log_likelihood, posteriors, EStep, Posteriors};
pub use table::{LogTable, PairTable};

use hmm_math::log_sum_exp;

/// Log-sum-exp over a state index range. Models always have at least one
/// state, so the empty case only arises for degenerate tables.
pub(crate) fn lse_states(values: impl Iterator<Item = f64>) -> f64 {
    log_sum_exp(values).unwrap_or(f64::NEG_INFINITY)
}
