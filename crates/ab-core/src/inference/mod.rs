//! Inference over observed conversion counts.

pub mod bayesian;
pub mod frequentist;
pub mod srm;
