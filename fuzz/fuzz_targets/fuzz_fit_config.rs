//! Fuzz target for fit.json parsing and validation.
//!
//! Parsing and validation must return errors, never panic.

#![no_main]

use hmm_config::{validate_fit_config, FitConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(config) = FitConfig::from_json(text) {
            let _ = validate_fit_config(&config);
        }
    }
});
