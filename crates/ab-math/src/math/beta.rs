//! Beta distribution utilities for conversion-rate posteriors.
//!
//! Provides PDF, CDF, and inverse CDF, plus mean/variance helpers.
//! The CDF is the regularized incomplete beta function evaluated with a
//! modified-Lentz continued fraction; the quantile is a short
//! Newton–Raphson solve on top of it.

use serde::{Deserialize, Serialize};

use super::special::log_beta;

const BETACF_MAX_ITERS: usize = 100;
const BETACF_EPS: f64 = 1.0e-15;
const BETACF_FPMIN: f64 = 1.0e-30;

const NEWTON_MAX_STEPS: usize = 10;
const NEWTON_LOWER: f64 = 1.0e-4;
const NEWTON_UPPER: f64 = 1.0 - 1.0e-4;
const NEWTON_TOL: f64 = 1.0e-12;

/// Parameters of a Beta(alpha, beta) distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaParams {
    /// Shape parameter alpha (successes + prior)
    pub alpha: f64,
    /// Shape parameter beta (failures + prior)
    pub beta: f64,
}

impl BetaParams {
    /// Create new Beta parameters with validation.
    ///
    /// Returns None if parameters are invalid (non-positive or NaN).
    pub fn new(alpha: f64, beta: f64) -> Option<Self> {
        if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
            return None;
        }
        Some(Self { alpha, beta })
    }

    /// Create Beta(1, 1) uniform prior.
    pub fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    /// Conjugate update after observing `successes` out of `trials`.
    ///
    /// Counts past `trials` are clamped so the failure count never goes negative.
    pub fn observe(&self, successes: u64, trials: u64) -> Self {
        let successes = successes.min(trials);
        Self {
            alpha: self.alpha + successes as f64,
            beta: self.beta + (trials - successes) as f64,
        }
    }

    /// E[p] = α / (α + β).
    pub fn mean(&self) -> f64 {
        beta_mean(self.alpha, self.beta)
    }

    /// Var[p] = αβ / ((α+β)²(α+β+1)).
    pub fn variance(&self) -> f64 {
        beta_var(self.alpha, self.beta)
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Equal-tailed interval holding `level` of the probability mass.
    pub fn credible_interval(&self, level: f64) -> (f64, f64) {
        let tail = (1.0 - level) / 2.0;
        (
            beta_inv_cdf(tail, self.alpha, self.beta),
            beta_inv_cdf(1.0 - tail, self.alpha, self.beta),
        )
    }
}

impl Default for BetaParams {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Mean of Beta(alpha, beta) = alpha / (alpha + beta).
pub fn beta_mean(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    alpha / (alpha + beta)
}

/// Variance of Beta(alpha, beta).
pub fn beta_var(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    let sum = alpha + beta;
    (alpha * beta) / (sum * sum * (sum + 1.0))
}

/// Log of the Beta PDF at x.
pub fn log_beta_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || alpha.is_nan() || beta.is_nan() {
        return f64::NAN;
    }
    if alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if !(0.0..=1.0).contains(&x) {
        return f64::NEG_INFINITY;
    }
    if x == 0.0 {
        if alpha < 1.0 {
            return f64::INFINITY;
        }
        if alpha > 1.0 {
            return f64::NEG_INFINITY;
        }
        return -log_beta(1.0, beta);
    }
    if x == 1.0 {
        if beta < 1.0 {
            return f64::INFINITY;
        }
        if beta > 1.0 {
            return f64::NEG_INFINITY;
        }
        return -log_beta(alpha, 1.0);
    }
    (alpha - 1.0) * x.ln() + (beta - 1.0) * (-x).ln_1p() - log_beta(alpha, beta)
}

/// Beta PDF at x.
pub fn beta_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    let log_pdf = log_beta_pdf(x, alpha, beta);
    if log_pdf.is_nan() {
        return f64::NAN;
    }
    if log_pdf == f64::INFINITY {
        return f64::INFINITY;
    }
    if log_pdf == f64::NEG_INFINITY {
        return 0.0;
    }
    log_pdf.exp()
}

/// Regularized incomplete beta function I_x(a, b), i.e. the Beta CDF.
///
/// Preconditions: a > 0, b > 0. Returns NaN on violated preconditions and
/// clamps x outside [0, 1] to the boundary values.
pub fn incomplete_beta_regularized(x: f64, a: f64, b: f64) -> f64 {
    if x.is_nan() || a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if a <= 0.0 || b <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let front = (a * x.ln() + b * (-x).ln_1p() - log_beta(a, b)).exp();
    let result = if x < (a + 1.0) / (a + b + 2.0) {
        front * betacf(a, b, x) / a
    } else {
        1.0 - front * betacf(b, a, 1.0 - x) / b
    };
    result.clamp(0.0, 1.0)
}

/// Beta CDF; alias of [`incomplete_beta_regularized`] with distribution-style naming.
pub fn beta_cdf(x: f64, alpha: f64, beta: f64) -> f64 {
    incomplete_beta_regularized(x, alpha, beta)
}

/// Inverse CDF (quantile) for Beta(alpha, beta).
///
/// Newton–Raphson seeded at the mean, with every iterate clamped to
/// `[1e-4, 1 - 1e-4]` and at most ten steps. The result is the best iterate
/// reached within that budget, not an exact root.
pub fn beta_inv_cdf(p: f64, alpha: f64, beta: f64) -> f64 {
    if p.is_nan() || alpha.is_nan() || beta.is_nan() {
        return f64::NAN;
    }
    if alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }

    let mut x = (alpha / (alpha + beta)).clamp(NEWTON_LOWER, NEWTON_UPPER);
    for _ in 0..NEWTON_MAX_STEPS {
        let err = incomplete_beta_regularized(x, alpha, beta) - p;
        let pdf = beta_pdf(x, alpha, beta);
        if !pdf.is_finite() || pdf <= 0.0 {
            break;
        }
        let next = (x - err / pdf).clamp(NEWTON_LOWER, NEWTON_UPPER);
        let step = (next - x).abs();
        x = next;
        if step < NEWTON_TOL {
            break;
        }
    }
    x
}

fn betacf(a: f64, b: f64, x: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < BETACF_FPMIN {
        d = BETACF_FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=BETACF_MAX_ITERS {
        let m_f = m as f64;
        let m2 = 2.0 * m_f;

        // Even step
        let aa = m_f * (b - m_f) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        // Odd step
        let aa = -(a + m_f) * (qab + m_f) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < BETACF_EPS {
            break;
        }
    }

    h
}
