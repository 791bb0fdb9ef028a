//! Log-space math utilities for Gaussian HMM estimation.

pub mod math;

pub use math::normal::*;
pub use math::stable::*;
