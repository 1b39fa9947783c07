//! Fuzz target for settings.json parsing and validation.
//!
//! Arbitrary bytes must either fail to parse, fail validation, or yield
//! settings an `Engine` accepts. Nothing may panic.

#![no_main]

use ab_config::{validate_settings, EngineSettings};
use ab_core::Engine;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(settings) = serde_json::from_slice::<EngineSettings>(data) else {
        return;
    };
    let valid = validate_settings(&settings).is_ok();
    assert_eq!(valid, Engine::new(settings).is_ok());
});
