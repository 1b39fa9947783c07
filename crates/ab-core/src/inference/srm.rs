//! Sample-ratio-mismatch check.
//!
//! A Pearson chi-square goodness-of-fit test of observed visitor counts
//! against the intended traffic split. A mismatch means assignment or
//! logging is broken upstream and any conversion comparison on the same
//! counts is suspect.

use ab_math::chi_square_sf;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_open_unit, EngineError, Result};
use crate::variation::{validate_arms, VariationSample};

/// Outcome of a sample-ratio check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrmResult {
    pub chi_square: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
    /// Expected visitors per arm under the intended split, in input order.
    pub expected_visitors: Vec<f64>,
    pub is_mismatch: bool,
}

/// Test observed visitors against `expected_weights` (equal split when `None`).
///
/// Weights need not sum to 1; they are normalized. Zero total traffic is
/// reported as a clean result with `p_value = 1`.
pub fn check_sample_ratio(
    variations: &[VariationSample],
    expected_weights: Option<&[f64]>,
    srm_alpha: f64,
) -> Result<SrmResult> {
    ensure_open_unit("srm_alpha", srm_alpha)?;
    validate_arms(variations, 2)?;

    let weights = normalized_weights(variations.len(), expected_weights)?;
    let total: f64 = variations.iter().map(|v| v.visitors as f64).sum();
    let expected_visitors: Vec<f64> = weights.iter().map(|w| w * total).collect();
    let degrees_of_freedom = variations.len() - 1;

    if total == 0.0 {
        return Ok(SrmResult {
            chi_square: 0.0,
            degrees_of_freedom,
            p_value: 1.0,
            expected_visitors,
            is_mismatch: false,
        });
    }

    let chi_square: f64 = variations
        .iter()
        .zip(&expected_visitors)
        .map(|(v, &e)| {
            let d = v.visitors as f64 - e;
            d * d / e
        })
        .sum();
    let p_value = chi_square_sf(chi_square, degrees_of_freedom as f64).clamp(0.0, 1.0);
    let is_mismatch = p_value < srm_alpha;

    if is_mismatch {
        tracing::warn!(chi_square, p_value, srm_alpha, "sample ratio mismatch detected");
    } else {
        tracing::debug!(chi_square, p_value, "sample ratio check passed");
    }

    Ok(SrmResult {
        chi_square,
        degrees_of_freedom,
        p_value,
        expected_visitors,
        is_mismatch,
    })
}

fn normalized_weights(arms: usize, weights: Option<&[f64]>) -> Result<Vec<f64>> {
    let Some(weights) = weights else {
        return Ok(vec![1.0 / arms as f64; arms]);
    };
    if weights.len() != arms {
        return Err(EngineError::invalid(
            "expected_weights",
            format!("expected {arms} weights, got {}", weights.len()),
        ));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w <= 0.0) {
        return Err(EngineError::invalid(
            "expected_weights",
            format!("weights must be finite and > 0, got {w}"),
        ));
    }
    let sum: f64 = weights.iter().sum();
    Ok(weights.iter().map(|w| w / sum).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arm(id: &str, n: u64) -> VariationSample {
        VariationSample::new(id, id, n, 0).expect("valid arm")
    }

    #[test]
    fn balanced_split_passes() {
        let r = check_sample_ratio(&[arm("a", 5000), arm("b", 5030)], None, 0.001).unwrap();
        assert!(!r.is_mismatch);
        assert!(r.p_value > 0.5);
        assert_eq!(r.degrees_of_freedom, 1);
        assert_eq!(r.expected_visitors, vec![5015.0, 5015.0]);
    }

    #[test]
    fn skewed_split_is_flagged() {
        // chi2 = 2 * 200^2 / 5000 = 16, p ~ 6.3e-5
        let r = check_sample_ratio(&[arm("a", 5200), arm("b", 4800)], None, 0.001).unwrap();
        assert!((r.chi_square - 16.0).abs() < 1e-9);
        assert!(r.p_value < 1e-4);
        assert!(r.is_mismatch);
    }

    #[test]
    fn weighted_split_matches_intent() {
        let arms = [arm("a", 9000), arm("b", 1000)];
        let r = check_sample_ratio(&arms, Some(&[9.0, 1.0]), 0.001).unwrap();
        assert_eq!(r.chi_square, 0.0);
        assert!(!r.is_mismatch);

        let r = check_sample_ratio(&arms, None, 0.001).unwrap();
        assert!(r.is_mismatch);
    }

    #[test]
    fn zero_traffic_is_clean() {
        let r = check_sample_ratio(&[arm("a", 0), arm("b", 0), arm("c", 0)], None, 0.001).unwrap();
        assert_eq!(r.p_value, 1.0);
        assert_eq!(r.degrees_of_freedom, 2);
        assert!(!r.is_mismatch);
    }

    #[test]
    fn huge_counts_do_not_overflow() {
        let n = u64::MAX / 2 + 1;
        let r = check_sample_ratio(&[arm("a", n), arm("b", n)], None, 0.001).unwrap();
        assert_eq!(r.chi_square, 0.0);
        assert!(!r.is_mismatch);
    }

    #[test]
    fn weights_are_validated() {
        let arms = [arm("a", 10), arm("b", 10)];
        assert!(check_sample_ratio(&arms, Some(&[1.0]), 0.001).is_err());
        assert!(check_sample_ratio(&arms, Some(&[1.0, 0.0]), 0.001).is_err());
        assert!(check_sample_ratio(&arms, Some(&[1.0, f64::NAN]), 0.001).is_err());
        assert!(check_sample_ratio(&arms, None, 0.0).is_err());
    }
}
