//! Per-variation observation summaries.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{EngineError, Result};

/// Aggregated counts for one arm of an experiment.
///
/// A snapshot supplied by the caller; the engine only borrows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationSample {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub visitors: u64,
    pub conversions: u64,
}

impl VariationSample {
    /// Build a sample, rejecting `conversions > visitors`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        visitors: u64,
        conversions: u64,
    ) -> Result<Self> {
        let sample = Self {
            id: id.into(),
            name: name.into(),
            visitors,
            conversions,
        };
        sample.validate()?;
        Ok(sample)
    }

    /// Observed conversion rate; `0` for an arm with no visitors.
    pub fn conversion_rate(&self) -> f64 {
        if self.visitors == 0 {
            return 0.0;
        }
        self.conversions as f64 / self.visitors as f64
    }

    /// Visitors that did not convert.
    pub fn failures(&self) -> u64 {
        self.visitors.saturating_sub(self.conversions)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(EngineError::InvalidSample {
                id: self.id.clone(),
                message: "variation id must not be empty".to_string(),
            });
        }
        if self.conversions > self.visitors {
            return Err(EngineError::InvalidSample {
                id: self.id.clone(),
                message: format!(
                    "conversions ({}) exceed visitors ({})",
                    self.conversions, self.visitors
                ),
            });
        }
        Ok(())
    }
}

/// Validate a set of arms: minimum count, unique ids, consistent counts.
pub(crate) fn validate_arms(variations: &[VariationSample], min_arms: usize) -> Result<()> {
    if variations.len() < min_arms {
        return Err(EngineError::InsufficientVariations {
            needed: min_arms,
            got: variations.len(),
        });
    }
    let mut seen = HashSet::with_capacity(variations.len());
    for v in variations {
        v.validate()?;
        if !seen.insert(v.id.as_str()) {
            return Err(EngineError::DuplicateVariation(v.id.clone()));
        }
    }
    Ok(())
}

/// Validate a control/treatment pair.
pub(crate) fn validate_pair(control: &VariationSample, treatment: &VariationSample) -> Result<()> {
    control.validate()?;
    treatment.validate()?;
    if control.id == treatment.id {
        return Err(EngineError::DuplicateVariation(control.id.clone()));
    }
    Ok(())
}

/// Index of the largest value; ties resolve to the earliest index.
pub(crate) fn argmax_first<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.into_iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
