//! Fuzz target for experiment snapshots as the CLI reads them.

#![no_main]

use ab_core::VariationSample;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(variations) = serde_json::from_slice::<Vec<VariationSample>>(data) {
        for v in &variations {
            if v.validate().is_ok() {
                let rate = v.conversion_rate();
                assert!((0.0..=1.0).contains(&rate));
            }
        }
    }
});
