//! Expectation-maximization for Gaussian HMMs.
//!
//! Each iteration is a pure function `Theta × observations → Theta`:
//! the E-step from [`crate::inference`] followed by [`m_step`].

pub mod controller;
pub mod mstep;

pub use controller::{estimate, Estimator, FitReport};
pub use mstep::m_step;
