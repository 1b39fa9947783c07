//! Beta-Binomial posterior comparison.
//!
//! Each arm's conversion rate gets a `Beta(prior_alpha, prior_beta)` prior,
//! updated conjugately with the observed counts. Superiority probabilities
//! and expected losses are Monte Carlo estimates over paired posterior
//! draws; `samples` trades accuracy for speed (standard error of a
//! probability estimate is at most `0.5 / sqrt(samples)`).

use ab_math::{variate::beta_variate, BetaParams};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_open_unit, ensure_positive, EngineError, Result};
use crate::variation::{argmax_first, validate_arms, validate_pair, VariationSample};

/// Prior and simulation knobs for Bayesian analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BayesianParams {
    pub prior_alpha: f64,
    pub prior_beta: f64,
    /// Mass of the equal-tailed credible interval.
    pub credible_level: f64,
    /// Monte Carlo draws per arm.
    pub samples: usize,
}

impl Default for BayesianParams {
    fn default() -> Self {
        Self {
            prior_alpha: 1.0,
            prior_beta: 1.0,
            credible_level: 0.95,
            samples: 10_000,
        }
    }
}

impl BayesianParams {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("prior_alpha", self.prior_alpha)?;
        ensure_positive("prior_beta", self.prior_beta)?;
        ensure_open_unit("credible_level", self.credible_level)?;
        if self.samples == 0 {
            return Err(EngineError::invalid("samples", "must be at least 1"));
        }
        Ok(())
    }

    fn prior(&self) -> BetaParams {
        BetaParams {
            alpha: self.prior_alpha,
            beta: self.prior_beta,
        }
    }
}

/// Posterior summary for a single arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationPosterior {
    pub variation_id: String,
    pub posterior: BetaParams,
    /// Share of draws in which this arm had the highest rate.
    pub probability_of_being_best: f64,
    /// Mean regret of picking this arm: `E[max_j r_j - r_self]`.
    pub expected_loss: f64,
    pub credible_interval: (f64, f64),
    pub posterior_mean: f64,
    pub posterior_std: f64,
}

/// Two-arm comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesianResult {
    pub control: VariationPosterior,
    pub treatment: VariationPosterior,
    pub probability_treatment_better: f64,
    pub credible_level: f64,
    pub samples: usize,
}

/// Posterior summaries for k arms, ordered as supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesianRanking {
    pub variations: Vec<VariationPosterior>,
    pub recommended_variation_id: String,
    pub credible_level: f64,
    pub samples: usize,
}

/// Compare two arms. Ties in a draw count for control, so the two
/// `probability_of_being_best` values sum to exactly 1.
pub fn analyze_bayesian<R: Rng + ?Sized>(
    control: &VariationSample,
    treatment: &VariationSample,
    params: &BayesianParams,
    rng: &mut R,
) -> Result<BayesianResult> {
    params.validate()?;
    validate_pair(control, treatment)?;

    // One posterior per arm, in input order.
    let mut posteriors = simulate(&[control, treatment], params, rng);
    let treatment_post = posteriors.swap_remove(1);
    let control_post = posteriors.swap_remove(0);

    let probability_treatment_better = treatment_post.probability_of_being_best;
    tracing::debug!(
        control = %control.id,
        treatment = %treatment.id,
        probability_treatment_better,
        samples = params.samples,
        "bayesian analysis complete"
    );

    Ok(BayesianResult {
        control: control_post,
        treatment: treatment_post,
        probability_treatment_better,
        credible_level: params.credible_level,
        samples: params.samples,
    })
}

/// Rank two or more arms by posterior probability of being best.
///
/// The recommendation is the arm with the highest probability; ties go to
/// the earliest arm.
pub fn rank_variations<R: Rng + ?Sized>(
    variations: &[VariationSample],
    params: &BayesianParams,
    rng: &mut R,
) -> Result<BayesianRanking> {
    params.validate()?;
    validate_arms(variations, 2)?;

    let arms: Vec<&VariationSample> = variations.iter().collect();
    let posteriors = simulate(&arms, params, rng);
    let best = argmax_first(posteriors.iter().map(|p| p.probability_of_being_best)).unwrap_or(0);
    let recommended_variation_id = posteriors[best].variation_id.clone();

    tracing::debug!(
        arms = posteriors.len(),
        recommended = %recommended_variation_id,
        samples = params.samples,
        "bayesian ranking complete"
    );

    Ok(BayesianRanking {
        variations: posteriors,
        recommended_variation_id,
        credible_level: params.credible_level,
        samples: params.samples,
    })
}

/// Shared Monte Carlo loop: one posterior draw per arm per sample.
fn simulate<R: Rng + ?Sized>(
    arms: &[&VariationSample],
    params: &BayesianParams,
    rng: &mut R,
) -> Vec<VariationPosterior> {
    let prior = params.prior();
    let posteriors: Vec<BetaParams> = arms
        .iter()
        .map(|arm| prior.observe(arm.conversions, arm.visitors))
        .collect();

    let mut wins = vec![0u64; arms.len()];
    let mut regret = vec![0.0f64; arms.len()];
    let mut draws = vec![0.0f64; arms.len()];

    for _ in 0..params.samples {
        for (slot, post) in draws.iter_mut().zip(&posteriors) {
            *slot = beta_variate(rng, post.alpha, post.beta);
        }
        let best = argmax_first(draws.iter().copied()).unwrap_or(0);
        wins[best] += 1;
        let top = draws[best];
        for (acc, &draw) in regret.iter_mut().zip(&draws) {
            *acc += top - draw;
        }
    }

    let n = params.samples as f64;
    arms.iter()
        .zip(posteriors)
        .enumerate()
        .map(|(i, (arm, posterior))| VariationPosterior {
            variation_id: arm.id.clone(),
            posterior,
            probability_of_being_best: wins[i] as f64 / n,
            expected_loss: regret[i] / n,
            credible_interval: posterior.credible_interval(params.credible_level),
            posterior_mean: posterior.mean(),
            posterior_std: posterior.std_dev(),
        })
        .collect()
}
