//! Fuzz target for serialized model parsing.

#![no_main]

use hmm_core::Theta;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Theta::from_json(text);
    }
});
