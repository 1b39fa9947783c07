//! Two-proportion z-test with effect size, power, and lift.
//!
//! Zero-variance convention: when the pooled standard error is zero or
//! undefined (an empty arm, or both arms at 0% / 100%), the z-score is
//! reported as exactly `0` and the p-value as `1.0`. The z-score is never
//! infinite and never NaN.

use ab_math::{normal_cdf, normal_inv_cdf};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_open_unit, Result};
use crate::variation::{validate_pair, VariationSample};

/// Outcome of a single frequentist comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentistResult {
    pub p_value: f64,
    pub z_score: f64,
    /// Cohen's h.
    pub effect_size: f64,
    pub power: f64,
    /// Total visitors across both arms.
    pub sample_size: u64,
    pub is_significant: bool,
    pub winning_variation_id: Option<String>,
    /// Relative lift of treatment over control, in percent. `0` when the control rate is `0`.
    pub lift_percentage: f64,
    /// Interval for the absolute rate difference `treatment - control`.
    pub confidence_interval: (f64, f64),
    pub alpha: f64,
}

/// Cohen's h: `2 (asin √p_t − asin √p_c)`.
pub fn cohens_h(control_rate: f64, treatment_rate: f64) -> f64 {
    2.0 * (treatment_rate.sqrt().asin() - control_rate.sqrt().asin())
}

/// Probability of rejecting at `z_crit` given standardized effect `delta`.
pub fn two_sided_power(z_crit: f64, delta: f64) -> f64 {
    (1.0 - normal_cdf(z_crit - delta) + normal_cdf(-z_crit - delta)).clamp(0.0, 1.0)
}

/// Compare `treatment` against `control` at significance level `alpha`.
pub fn analyze_frequentist(
    control: &VariationSample,
    treatment: &VariationSample,
    alpha: f64,
) -> Result<FrequentistResult> {
    ensure_open_unit("alpha", alpha)?;
    validate_pair(control, treatment)?;

    let rc = control.conversion_rate();
    let rt = treatment.conversion_rate();
    let diff = rt - rc;
    let z_crit = normal_inv_cdf(1.0 - alpha / 2.0);

    // Counts may be near u64::MAX; sums are taken in f64 and the reported
    // total saturates.
    let total_visitors = control.visitors.saturating_add(treatment.visitors);
    let visitors = control.visitors as f64 + treatment.visitors as f64;
    let empty_arm = control.visitors == 0 || treatment.visitors == 0;
    let inv_n = if empty_arm {
        0.0
    } else {
        1.0 / control.visitors as f64 + 1.0 / treatment.visitors as f64
    };
    let pooled = if visitors == 0.0 {
        0.0
    } else {
        ((control.conversions as f64 + treatment.conversions as f64) / visitors).clamp(0.0, 1.0)
    };
    let se = (pooled * (1.0 - pooled) * inv_n).sqrt();

    let (z_score, p_value) = if se > 0.0 && se.is_finite() {
        let z = diff / se;
        let p = (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0);
        (z, p)
    } else {
        tracing::warn!(
            control = %control.id,
            treatment = %treatment.id,
            empty_arm,
            "zero-variance comparison; reporting z=0, p=1"
        );
        (0.0, 1.0)
    };

    let effect_size = cohens_h(rc, rt);
    let delta = if inv_n > 0.0 {
        effect_size / inv_n.sqrt()
    } else {
        0.0
    };
    let power = two_sided_power(z_crit, delta);

    let lift_percentage = if rc > 0.0 { diff / rc * 100.0 } else { 0.0 };
    let margin = if se.is_finite() { z_crit * se } else { 0.0 };
    let confidence_interval = (diff - margin, diff + margin);

    let is_significant = p_value < alpha;
    let winning_variation_id = if is_significant {
        if rt > rc {
            Some(treatment.id.clone())
        } else {
            Some(control.id.clone())
        }
    } else {
        None
    };

    tracing::debug!(
        control = %control.id,
        treatment = %treatment.id,
        z_score,
        p_value,
        lift_percentage,
        is_significant,
        "frequentist analysis complete"
    );

    Ok(FrequentistResult {
        p_value,
        z_score,
        effect_size,
        power,
        sample_size: total_visitors,
        is_significant,
        winning_variation_id,
        lift_percentage,
        confidence_interval,
        alpha,
    })
}
