//! Fuzz target for the estimator on arbitrary inputs.
//!
//! Any combination of observations and parameters must produce either a
//! model or an `EstimateError`, never a panic.

#![no_main]

use arbitrary::Arbitrary;
use hmm_core::{estimate, Theta};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    observations: Vec<f64>,
    initial: Vec<f64>,
    transition: Vec<Vec<f64>>,
    mean: Vec<f64>,
    stddev: Vec<f64>,
    max_iter: u8,
}

fuzz_target!(|input: Input| {
    if input.observations.len() > 256 || input.initial.len() > 8 {
        return;
    }
    let Ok(theta) = Theta::new(input.initial, input.transition, input.mean, input.stddev) else {
        return;
    };
    let _ = estimate(&input.observations, &theta, usize::from(input.max_iter % 8));
});
