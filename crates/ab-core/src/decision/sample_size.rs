//! Per-variation sample size for a two-proportion test.

use ab_math::normal_inv_cdf;

use crate::error::{ensure_open_unit, EngineError, Result};

/// Visitors needed in each arm to detect a relative change of `mde_relative`
/// from `baseline_rate` with a two-sided test at `alpha` and the given `power`.
///
/// `n = ⌈(z_{1−α/2} + z_{power})² (p1(1−p1) + p2(1−p2)) / (p2 − p1)²⌉`
/// with `p2 = p1 (1 + mde_relative)`. Negative effects are allowed as long
/// as `p2` stays in `(0, 1]`.
pub fn sample_size(baseline_rate: f64, mde_relative: f64, alpha: f64, power: f64) -> Result<u64> {
    ensure_open_unit("baseline_rate", baseline_rate)?;
    ensure_open_unit("alpha", alpha)?;
    ensure_open_unit("power", power)?;
    if !mde_relative.is_finite() || mde_relative == 0.0 {
        return Err(EngineError::invalid(
            "mde_relative",
            format!("must be finite and non-zero, got {mde_relative}"),
        ));
    }

    let p1 = baseline_rate;
    let p2 = p1 * (1.0 + mde_relative);
    if !(p2 > 0.0 && p2 <= 1.0) {
        return Err(EngineError::invalid(
            "mde_relative",
            format!("treatment rate {p2} falls outside (0, 1]"),
        ));
    }

    let z_alpha = normal_inv_cdf(1.0 - alpha / 2.0);
    let z_beta = normal_inv_cdf(power);
    let variance = p1 * (1.0 - p1) + p2 * (1.0 - p2);
    let delta = p2 - p1;
    let n = ((z_alpha + z_beta).powi(2) * variance / (delta * delta)).ceil();

    tracing::debug!(baseline_rate, mde_relative, alpha, power, n, "sample size computed");
    Ok(n as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textbook_values() {
        let n = sample_size(0.05, 0.10, 0.05, 0.8).unwrap();
        assert!((31_200..=31_260).contains(&n), "n = {n}");
        let n = sample_size(0.05, 0.50, 0.05, 0.8).unwrap();
        assert!((1_460..=1_475).contains(&n), "n = {n}");
    }

    #[test]
    fn smaller_effect_needs_more_traffic() {
        let small = sample_size(0.05, 0.10, 0.05, 0.8).unwrap();
        let large = sample_size(0.05, 0.50, 0.05, 0.8).unwrap();
        assert!(small > large);
    }

    #[test]
    fn more_power_needs_more_traffic() {
        let high = sample_size(0.05, 0.10, 0.05, 0.9).unwrap();
        let low = sample_size(0.05, 0.10, 0.05, 0.7).unwrap();
        assert!(high > low);
    }

    #[test]
    fn negative_effect_is_supported() {
        let n = sample_size(0.20, -0.25, 0.05, 0.8).unwrap();
        assert!(n > 0);
    }

    #[test]
    fn rejects_out_of_domain() {
        assert!(sample_size(0.0, 0.1, 0.05, 0.8).is_err());
        assert!(sample_size(0.05, 0.0, 0.05, 0.8).is_err());
        assert!(sample_size(0.6, 1.0, 0.05, 0.8).is_err());
        assert!(sample_size(0.05, -1.0, 0.05, 0.8).is_err());
        assert!(sample_size(0.05, 0.1, 1.0, 0.8).is_err());
        assert!(sample_size(0.05, 0.1, 0.05, 0.0).is_err());
    }
}
