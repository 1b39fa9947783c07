//! Fuzz target for the testers and allocators.
//!
//! Any consistent set of counts must produce finite, in-range results.

#![no_main]

use ab_core::{analyze_frequentist, check_sample_ratio, BanditStrategy, VariationSample};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Arbitrary)]
struct Input {
    arms: Vec<(u32, u32)>,
    alpha_bits: u16,
    epsilon_bits: u8,
    seed: u64,
}

fuzz_target!(|input: Input| {
    let variations: Vec<VariationSample> = input
        .arms
        .iter()
        .take(8)
        .enumerate()
        .filter_map(|(i, &(n, x))| {
            let n = u64::from(n);
            VariationSample::new(format!("v{i}"), "", n, u64::from(x) % (n + 1)).ok()
        })
        .collect();
    if variations.len() < 2 {
        return;
    }

    let alpha = (f64::from(input.alpha_bits) + 1.0) / (f64::from(u16::MAX) + 2.0);
    if let Ok(r) = analyze_frequentist(&variations[0], &variations[1], alpha) {
        assert!(r.p_value.is_finite() && (0.0..=1.0).contains(&r.p_value));
        assert!(r.z_score.is_finite());
        assert!(r.lift_percentage.is_finite());
    }

    let epsilon = f64::from(input.epsilon_bits) / 255.0;
    let mut rng = StdRng::seed_from_u64(input.seed);
    for strategy in [
        BanditStrategy::ThompsonSampling { rounds: 50 },
        BanditStrategy::EpsilonGreedy { epsilon },
        BanditStrategy::Ucb,
    ] {
        let alloc = strategy
            .allocate(&variations, &mut rng)
            .expect("valid arms allocate");
        assert!((alloc.total_share() - 1.0).abs() < 1e-9);
    }

    let srm = check_sample_ratio(&variations, None, 0.001).expect("valid arms check");
    assert!((0.0..=1.0).contains(&srm.p_value));
});
