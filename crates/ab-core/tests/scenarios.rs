//! Worked experiment scenarios through the public API.

use ab_core::{
    analyze_bayesian, analyze_frequentist, analyze_sequential, check_sample_ratio,
    rank_variations, sample_size, BanditStrategy, BayesianParams, Engine, SequentialParams,
    VariationSample,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn arm(id: &str, visitors: u64, conversions: u64) -> VariationSample {
    VariationSample::new(id, id.to_uppercase(), visitors, conversions).expect("valid arm")
}

#[test]
fn modest_lift_reports_thirty_percent() {
    let r = analyze_frequentist(&arm("control", 1000, 50), &arm("treatment", 1000, 65), 0.05)
        .unwrap();
    assert!((r.lift_percentage - 30.0).abs() < 1e-9);
    assert!(r.p_value > 0.0 && r.p_value < 1.0);
    let (lo, hi) = r.confidence_interval;
    assert!(lo.is_finite() && hi.is_finite() && lo < hi);
}

#[test]
fn doubled_conversion_rate_wins() {
    let r = analyze_frequentist(&arm("control", 1000, 50), &arm("treatment", 1000, 100), 0.05)
        .unwrap();
    assert!(r.is_significant);
    assert!(r.p_value < 0.05);
    assert_eq!(r.winning_variation_id.as_deref(), Some("treatment"));
}

#[test]
fn sparse_control_produces_only_finite_numbers() {
    let r = analyze_frequentist(&arm("control", 100, 0), &arm("treatment", 1000, 2), 0.05)
        .unwrap();
    let json = serde_json::to_value(&r).unwrap();
    for key in ["p_value", "z_score", "effect_size", "power", "lift_percentage"] {
        assert!(json[key].as_f64().unwrap().is_finite(), "{key}");
    }
}

#[test]
fn thompson_sampling_recommends_best_of_three() {
    let arms = [arm("a", 1000, 50), arm("b", 1000, 65), arm("c", 1000, 45)];
    let alloc = BanditStrategy::ThompsonSampling { rounds: 1000 }
        .allocate(&arms, &mut StdRng::seed_from_u64(2024))
        .unwrap();
    assert_eq!(alloc.recommended_variation_id, "b");
    let best_share = alloc.allocation["b"];
    assert!(alloc.allocation.iter().all(|(_, &s)| s <= best_share));
}

#[test]
fn bayesian_and_frequentist_agree_on_direction() {
    let control = arm("control", 2000, 100);
    let treatment = arm("treatment", 2000, 140);
    let freq = analyze_frequentist(&control, &treatment, 0.05).unwrap();
    let bayes = analyze_bayesian(
        &control,
        &treatment,
        &BayesianParams::default(),
        &mut StdRng::seed_from_u64(11),
    )
    .unwrap();
    assert!(freq.lift_percentage > 0.0);
    assert!(bayes.probability_treatment_better > 0.5);
    assert!(bayes.control.expected_loss > bayes.treatment.expected_loss);
}

#[test]
fn ranking_two_arms_matches_pairwise_analysis() {
    let control = arm("control", 500, 30);
    let treatment = arm("treatment", 500, 38);
    let params = BayesianParams::default();
    let pair = analyze_bayesian(&control, &treatment, &params, &mut StdRng::seed_from_u64(5))
        .unwrap();
    let ranked = rank_variations(
        &[control, treatment],
        &params,
        &mut StdRng::seed_from_u64(5),
    )
    .unwrap();
    assert_eq!(ranked.variations[0], pair.control);
    assert_eq!(ranked.variations[1], pair.treatment);
}

#[test]
fn experiment_lifecycle_plan_look_decide() {
    let per_arm = sample_size(0.05, 0.30, 0.05, 0.8).unwrap();
    let max_total = per_arm * 2;
    let params = SequentialParams::default();

    // First look at 10% of the plan: nothing decided yet.
    let early = analyze_sequential(
        &arm("control", max_total / 20, max_total / 400),
        &arm("treatment", max_total / 20, max_total / 400),
        max_total,
        &params,
    )
    .unwrap();
    assert!(!early.should_stop);
    assert!(early.next_sample_size.unwrap() > max_total / 10);

    // Full sample reached: stop regardless of outcome.
    let last = analyze_sequential(
        &arm("control", per_arm, per_arm / 20),
        &arm("treatment", per_arm, per_arm * 13 / 200),
        max_total,
        &params,
    )
    .unwrap();
    assert!(last.should_stop);
    assert!(last.next_sample_size.is_none());
}

#[test]
fn srm_flags_broken_assignment_before_analysis() {
    let arms = [arm("control", 10_000, 500), arm("treatment", 10_600, 560)];
    let srm = check_sample_ratio(&arms, None, 0.001).unwrap();
    assert!(srm.is_mismatch);
}

#[test]
fn engine_defaults_match_free_functions() {
    let engine = Engine::default();
    let control = arm("control", 1000, 50);
    let treatment = arm("treatment", 1000, 65);
    assert_eq!(
        engine.frequentist(&control, &treatment).unwrap(),
        analyze_frequentist(&control, &treatment, 0.05).unwrap()
    );
    assert_eq!(
        engine.sample_size(0.05, 0.1).unwrap(),
        sample_size(0.05, 0.1, 0.05, 0.8).unwrap()
    );
}
