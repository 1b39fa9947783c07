//! Engine tunables.
//!
//! Every knob the statistics engine exposes lives here with its default, so
//! callers pass configuration explicitly instead of relying on constants
//! buried in the testers.

use serde::{Deserialize, Serialize};

/// Complete engine settings. Missing fields in a settings file take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub schema_version: String,

    pub description: Option<String>,

    /// Significance threshold for frequentist and sequential tests.
    pub alpha: f64,

    /// Target power for sample-size planning.
    pub power: f64,

    /// Beta prior shape shared by every arm.
    pub prior_alpha: f64,
    pub prior_beta: f64,

    /// Width of Bayesian credible intervals.
    pub confidence_level: f64,

    /// Paired posterior draws per Bayesian analysis; trades precision for speed.
    pub monte_carlo_samples: usize,

    /// Exploration rate for epsilon-greedy allocation.
    pub bandit_epsilon: f64,

    /// Simulated rounds for Thompson Sampling allocation.
    pub bandit_rounds: usize,

    /// Fraction of the maximum sample added between sequential looks.
    pub sequential_look_step: f64,

    /// Threshold below which a sample-ratio p-value flags a mismatch.
    pub srm_alpha: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            alpha: 0.05,
            power: 0.8,
            prior_alpha: 1.0,
            prior_beta: 1.0,
            confidence_level: 0.95,
            monte_carlo_samples: 10_000,
            bandit_epsilon: 0.1,
            bandit_rounds: 1_000,
            sequential_look_step: 0.10,
            srm_alpha: 0.001,
        }
    }
}

impl EngineSettings {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    pub fn with_prior(mut self, prior_alpha: f64, prior_beta: f64) -> Self {
        self.prior_alpha = prior_alpha;
        self.prior_beta = prior_beta;
        self
    }

    pub fn with_monte_carlo_samples(mut self, samples: usize) -> Self {
        self.monte_carlo_samples = samples;
        self
    }

    pub fn with_bandit_epsilon(mut self, epsilon: f64) -> Self {
        self.bandit_epsilon = epsilon;
        self
    }
}
