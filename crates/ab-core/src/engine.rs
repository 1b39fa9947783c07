//! Settings-bound facade over the analysis functions.
//!
//! The free functions take every knob explicitly; `Engine` holds one
//! validated [`EngineSettings`] and fills those knobs in, so a service can
//! load configuration once and call analyses without threading parameters.

use ab_config::{validate_settings, EngineSettings};
use rand::Rng;

use crate::decision::bandit::{BanditAllocation, BanditStrategy};
use crate::decision::sample_size::sample_size;
use crate::decision::sequential::{analyze_sequential, SequentialDecision, SequentialParams};
use crate::error::Result;
use crate::inference::bayesian::{
    analyze_bayesian, rank_variations, BayesianParams, BayesianRanking, BayesianResult,
};
use crate::inference::frequentist::{analyze_frequentist, FrequentistResult};
use crate::inference::srm::{check_sample_ratio, SrmResult};
use crate::variation::VariationSample;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Engine {
    settings: EngineSettings,
}

impl Engine {
    /// Validate `settings` and bind them.
    pub fn new(settings: EngineSettings) -> Result<Self> {
        validate_settings(&settings)?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn bayesian_params(&self) -> BayesianParams {
        BayesianParams {
            prior_alpha: self.settings.prior_alpha,
            prior_beta: self.settings.prior_beta,
            credible_level: self.settings.confidence_level,
            samples: self.settings.monte_carlo_samples,
        }
    }

    pub fn sequential_params(&self) -> SequentialParams {
        SequentialParams {
            alpha: self.settings.alpha,
            look_step: self.settings.sequential_look_step,
        }
    }

    /// Resolve a strategy tag, tuned with the configured rounds and epsilon.
    pub fn strategy(&self, tag: &str) -> Result<BanditStrategy> {
        Ok(match tag.parse::<BanditStrategy>()? {
            BanditStrategy::ThompsonSampling { .. } => BanditStrategy::ThompsonSampling {
                rounds: self.settings.bandit_rounds,
            },
            BanditStrategy::EpsilonGreedy { .. } => BanditStrategy::EpsilonGreedy {
                epsilon: self.settings.bandit_epsilon,
            },
            BanditStrategy::Ucb => BanditStrategy::Ucb,
        })
    }

    pub fn frequentist(
        &self,
        control: &VariationSample,
        treatment: &VariationSample,
    ) -> Result<FrequentistResult> {
        analyze_frequentist(control, treatment, self.settings.alpha)
    }

    pub fn bayesian<R: Rng + ?Sized>(
        &self,
        control: &VariationSample,
        treatment: &VariationSample,
        rng: &mut R,
    ) -> Result<BayesianResult> {
        analyze_bayesian(control, treatment, &self.bayesian_params(), rng)
    }

    pub fn rank<R: Rng + ?Sized>(
        &self,
        variations: &[VariationSample],
        rng: &mut R,
    ) -> Result<BayesianRanking> {
        rank_variations(variations, &self.bayesian_params(), rng)
    }

    pub fn sequential(
        &self,
        control: &VariationSample,
        treatment: &VariationSample,
        max_sample_size: u64,
    ) -> Result<SequentialDecision> {
        analyze_sequential(control, treatment, max_sample_size, &self.sequential_params())
    }

    pub fn allocate<R: Rng + ?Sized>(
        &self,
        variations: &[VariationSample],
        strategy_tag: &str,
        rng: &mut R,
    ) -> Result<BanditAllocation> {
        self.strategy(strategy_tag)?.allocate(variations, rng)
    }

    /// Per-variation sample size at the configured alpha and power.
    pub fn sample_size(&self, baseline_rate: f64, mde_relative: f64) -> Result<u64> {
        sample_size(
            baseline_rate,
            mde_relative,
            self.settings.alpha,
            self.settings.power,
        )
    }

    pub fn check_sample_ratio(
        &self,
        variations: &[VariationSample],
        expected_weights: Option<&[f64]>,
    ) -> Result<SrmResult> {
        check_sample_ratio(variations, expected_weights, self.settings.srm_alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn arm(id: &str, n: u64, x: u64) -> VariationSample {
        VariationSample::new(id, id, n, x).expect("valid arm")
    }

    #[test]
    fn rejects_invalid_settings() {
        let err = Engine::new(EngineSettings::default().with_alpha(1.5)).unwrap_err();
        assert!(matches!(err, EngineError::Settings(_)));
    }

    #[test]
    fn uses_configured_alpha() {
        let c = arm("c", 1000, 50);
        let t = arm("t", 1000, 65);
        let strict = Engine::new(EngineSettings::default().with_alpha(0.01)).unwrap();
        let loose = Engine::new(EngineSettings::default().with_alpha(0.20)).unwrap();
        assert!(!strict.frequentist(&c, &t).unwrap().is_significant);
        assert!(loose.frequentist(&c, &t).unwrap().is_significant);
    }

    #[test]
    fn strategy_picks_up_settings() {
        let engine = Engine::new(EngineSettings::default().with_bandit_epsilon(0.3)).unwrap();
        assert_eq!(
            engine.strategy("epsilon-greedy").unwrap(),
            BanditStrategy::EpsilonGreedy { epsilon: 0.3 }
        );
        assert_eq!(
            engine.strategy("thompson-sampling").unwrap(),
            BanditStrategy::ThompsonSampling { rounds: 1_000 }
        );
        assert!(engine.strategy("round-robin").is_err());
    }

    #[test]
    fn bayesian_uses_configured_samples() {
        let engine = Engine::new(EngineSettings::default().with_monte_carlo_samples(500)).unwrap();
        let r = engine
            .bayesian(&arm("c", 100, 5), &arm("t", 100, 9), &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(r.samples, 500);
    }

    #[test]
    fn sample_size_uses_configured_power() {
        let low = Engine::new(EngineSettings::default().with_power(0.7)).unwrap();
        let high = Engine::new(EngineSettings::default().with_power(0.9)).unwrap();
        assert!(high.sample_size(0.05, 0.1).unwrap() > low.sample_size(0.05, 0.1).unwrap());
    }
}
