//! Interim looks with O'Brien-Fleming-style alpha spending.
//!
//! At information fraction `t` the test runs at
//! `α(t) = 2(1 − Φ(z_{1−α/2} / √t))`, which spends almost nothing early and
//! reaches the nominal `α` at `t = 1`. Peeking at every look therefore does
//! not inflate the overall false-positive rate the way repeated fixed-alpha
//! tests do.

use ab_math::{normal_cdf, normal_inv_cdf};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_open_unit, EngineError, Result};
use crate::inference::frequentist::{analyze_frequentist, FrequentistResult};
use crate::variation::{validate_pair, VariationSample};

/// Spent alpha never drops below this, so the per-look test stays well defined.
const MIN_SPENT_ALPHA: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequentialParams {
    /// Overall significance level across all looks.
    pub alpha: f64,
    /// Fraction of `max_sample_size` between recommended looks.
    pub look_step: f64,
}

impl Default for SequentialParams {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            look_step: 0.10,
        }
    }
}

impl SequentialParams {
    pub fn validate(&self) -> Result<()> {
        ensure_open_unit("alpha", self.alpha)?;
        if !(self.look_step > 0.0 && self.look_step <= 1.0) {
            return Err(EngineError::invalid(
                "look_step",
                format!("must be in (0, 1], got {}", self.look_step),
            ));
        }
        Ok(())
    }
}

/// Outcome of one interim look.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequentialDecision {
    pub should_stop: bool,
    /// Frequentist test at the spent alpha; `None` before any traffic.
    pub result: Option<FrequentistResult>,
    /// Total visitors at which to look next; `None` once stopping.
    pub next_sample_size: Option<u64>,
    /// Observed visitors over `max_sample_size`; may exceed 1.
    pub progress: f64,
    pub spent_alpha: f64,
    pub rationale: String,
}

/// Alpha available at information fraction `t` (capped at 1).
pub fn obrien_fleming_alpha(alpha: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    let t = t.min(1.0);
    let z = normal_inv_cdf(1.0 - alpha / 2.0);
    (2.0 * (1.0 - normal_cdf(z / t.sqrt()))).clamp(0.0, alpha)
}

/// Evaluate an interim look for a planned total of `max_sample_size` visitors.
pub fn analyze_sequential(
    control: &VariationSample,
    treatment: &VariationSample,
    max_sample_size: u64,
    params: &SequentialParams,
) -> Result<SequentialDecision> {
    params.validate()?;
    validate_pair(control, treatment)?;
    if max_sample_size == 0 {
        return Err(EngineError::invalid("max_sample_size", "must be at least 1"));
    }

    let observed = control.visitors as f64 + treatment.visitors as f64;
    let max = max_sample_size as f64;
    let progress = observed / max;
    let next_look = |p: f64| (max * (p + params.look_step).min(1.0)).floor() as u64;

    if observed == 0.0 {
        return Ok(SequentialDecision {
            should_stop: false,
            result: None,
            next_sample_size: Some(next_look(0.0)),
            progress: 0.0,
            spent_alpha: 0.0,
            rationale: "no traffic yet".to_string(),
        });
    }

    let spent_alpha = obrien_fleming_alpha(params.alpha, progress).max(MIN_SPENT_ALPHA);
    let result = analyze_frequentist(control, treatment, spent_alpha)?;
    let complete = progress >= 1.0;
    let should_stop = result.is_significant || complete;

    let rationale = if result.is_significant {
        format!(
            "significant at spent alpha {spent_alpha:.3e} (p = {:.3e})",
            result.p_value
        )
    } else if complete {
        "reached maximum sample size without significance".to_string()
    } else {
        format!(
            "continue: p = {:.3e} above spent alpha {spent_alpha:.3e}",
            result.p_value
        )
    };
    let next_sample_size = (!should_stop).then(|| next_look(progress));

    tracing::debug!(
        progress,
        spent_alpha,
        should_stop,
        next_sample_size,
        "sequential look evaluated"
    );

    Ok(SequentialDecision {
        should_stop,
        result: Some(result),
        next_sample_size,
        progress,
        spent_alpha,
        rationale,
    })
}
