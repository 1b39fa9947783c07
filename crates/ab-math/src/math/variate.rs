//! Random-variate generators for Monte Carlo estimators.
//!
//! Every generator borrows the caller's RNG. Nothing here touches a
//! process-global generator, so a seeded `StdRng` gives reproducible draws.

use rand::Rng;
use std::f64::consts::PI;

/// Uniform draw on the open interval (0, 1).
pub fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u: f64 = rng.random();
        if u > 0.0 {
            return u;
        }
    }
}

/// Standard normal draw via Box–Muller.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = open_unit(rng);
    let u2 = open_unit(rng);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Gamma(shape, rate) draw.
///
/// Marsaglia–Tsang squeeze for `shape >= 1`; for `shape < 1` the draw is
/// boosted from `Gamma(shape + 1)` by `U^(1/shape)`.
/// Returns NaN for non-positive or NaN parameters.
pub fn gamma_variate<R: Rng + ?Sized>(rng: &mut R, shape: f64, rate: f64) -> f64 {
    if shape.is_nan() || rate.is_nan() || shape <= 0.0 || rate <= 0.0 {
        return f64::NAN;
    }
    if shape < 1.0 {
        let u = open_unit(rng);
        return gamma_variate(rng, shape + 1.0, rate) * u.powf(1.0 / shape);
    }

    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    loop {
        let (x, v) = loop {
            let x = standard_normal(rng);
            let v = 1.0 + c * x;
            if v > 0.0 {
                break (x, v);
            }
        };
        let v = v * v * v;
        let u = open_unit(rng);
        let x2 = x * x;
        if u < 1.0 - 0.0331 * x2 * x2 || u.ln() < 0.5 * x2 + d * (1.0 - v + v.ln()) {
            return d * v / rate;
        }
    }
}

/// Beta(alpha, beta) draw as `G1 / (G1 + G2)` with unit-rate gammas.
pub fn beta_variate<R: Rng + ?Sized>(rng: &mut R, alpha: f64, beta: f64) -> f64 {
    let g1 = gamma_variate(rng, alpha, 1.0);
    let g2 = gamma_variate(rng, beta, 1.0);
    if g1.is_nan() || g2.is_nan() {
        return f64::NAN;
    }
    let total = g1 + g2;
    if total <= 0.0 {
        // Both draws underflowed; fall back to the mean.
        return alpha / (alpha + beta);
    }
    g1 / total
}
