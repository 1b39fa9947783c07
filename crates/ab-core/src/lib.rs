//! Experiment Statistics Core Library
//!
//! Decides, from per-variation visitor/conversion counts, whether an
//! experiment has a winner and how traffic should move while it runs:
//! - Frequentist two-proportion z-test with power and lift
//! - Bayesian Beta-Binomial posteriors with Monte Carlo superiority
//! - Sequential (alpha-spending) interim looks
//! - Multi-armed bandit allocation
//! - Sample-size planning and sample-ratio-mismatch checks
//!
//! Every analysis is a pure function of its inputs; Monte Carlo routines take
//! the caller's RNG explicitly. The binary entry point is in `main.rs`.

pub mod decision;
pub mod engine;
pub mod error;
pub mod exit_codes;
pub mod inference;
pub mod logging;
pub mod variation;

pub use decision::bandit::{BanditAllocation, BanditStrategy};
pub use decision::sample_size::sample_size;
pub use decision::sequential::{analyze_sequential, SequentialDecision, SequentialParams};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use inference::bayesian::{
    analyze_bayesian, rank_variations, BayesianParams, BayesianRanking, BayesianResult,
    VariationPosterior,
};
pub use inference::frequentist::{analyze_frequentist, FrequentistResult};
pub use inference::srm::{check_sample_ratio, SrmResult};
pub use variation::VariationSample;
