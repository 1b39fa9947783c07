//! Standard normal distribution: density, CDF, and quantile approximations.
//!
//! Accuracy targets are those of A/B analysis, not arbitrary precision:
//! the CDF is good to ~1e-7 and the quantile to ~1e-9 in the central region.

use std::f64::consts::PI;

// Abramowitz & Stegun 26.2.17
const AS_P: f64 = 0.231_641_9;
const AS_B: [f64; 5] = [
    0.319_381_530,
    -0.356_563_782,
    1.781_477_937,
    -1.821_255_978,
    1.330_274_429,
];

// Acklam's rational approximation for the lower half of the quantile function.
const ACKLAM_A: [f64; 6] = [
    -3.969_683_028_665_376e1,
    2.209_460_984_245_205e2,
    -2.759_285_104_469_687e2,
    1.383_577_518_672_690e2,
    -3.066_479_806_614_716e1,
    2.506_628_277_459_239,
];
const ACKLAM_B: [f64; 5] = [
    -5.447_609_879_822_406e1,
    1.615_858_368_580_409e2,
    -1.556_989_798_598_866e2,
    6.680_131_188_771_972e1,
    -1.328_068_155_288_572e1,
];
const ACKLAM_C: [f64; 6] = [
    -7.784_894_002_430_293e-3,
    -3.223_964_580_411_365e-1,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];
const ACKLAM_D: [f64; 4] = [
    7.784_695_709_041_462e-3,
    3.224_671_290_700_398e-1,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
];
const ACKLAM_P_LOW: f64 = 0.024_25;

/// Standard normal density φ(x).
pub fn normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Standard normal CDF Φ(x).
///
/// Rational approximation on |x| mirrored to the negative half, so
/// `normal_cdf(-x) == 1 - normal_cdf(x)` up to rounding.
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }

    let z = x.abs();
    let t = 1.0 / (1.0 + AS_P * z);
    let poly = t * (AS_B[0] + t * (AS_B[1] + t * (AS_B[2] + t * (AS_B[3] + t * AS_B[4]))));
    let upper = (normal_pdf(z) * poly).clamp(0.0, 1.0);

    if x >= 0.0 {
        1.0 - upper
    } else {
        upper
    }
}

/// Standard normal quantile Φ⁻¹(p).
///
/// Valid for p in (0, 1). The lower half is approximated directly and the
/// upper half is obtained by flipping the sign of the mirrored probability.
/// Returns -inf for p <= 0, +inf for p >= 1, and NaN for NaN.
pub fn normal_inv_cdf(p: f64) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    if p == 0.5 {
        return 0.0;
    }

    let q = p.min(1.0 - p);
    let lower = lower_half_quantile(q);
    if p > 0.5 {
        -lower
    } else {
        lower
    }
}

/// Quantile for q in (0, 0.5].
fn lower_half_quantile(q: f64) -> f64 {
    if q < ACKLAM_P_LOW {
        let r = (-2.0 * q.ln()).sqrt();
        let num = ((((ACKLAM_C[0] * r + ACKLAM_C[1]) * r + ACKLAM_C[2]) * r + ACKLAM_C[3]) * r
            + ACKLAM_C[4])
            * r
            + ACKLAM_C[5];
        let den = (((ACKLAM_D[0] * r + ACKLAM_D[1]) * r + ACKLAM_D[2]) * r + ACKLAM_D[3]) * r + 1.0;
        num / den
    } else {
        let u = q - 0.5;
        let r = u * u;
        let num = (((((ACKLAM_A[0] * r + ACKLAM_A[1]) * r + ACKLAM_A[2]) * r + ACKLAM_A[3]) * r
            + ACKLAM_A[4])
            * r
            + ACKLAM_A[5])
            * u;
        let den = ((((ACKLAM_B[0] * r + ACKLAM_B[1]) * r + ACKLAM_B[2]) * r + ACKLAM_B[3]) * r
            + ACKLAM_B[4])
            * r
            + 1.0;
        num / den
    }
}
