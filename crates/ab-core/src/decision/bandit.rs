//! Multi-armed bandit traffic allocation.
//!
//! Conventions shared by every strategy:
//! - an arm with no visitors has rate `0`;
//! - ties resolve to the earliest arm in input order;
//! - the returned shares sum to 1.

use ab_math::variate::beta_variate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, Result};
use crate::variation::{argmax_first, validate_arms, VariationSample};

pub const DEFAULT_THOMPSON_ROUNDS: usize = 1_000;
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Allocation strategy. Parsed from and displayed as its kebab-case tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BanditStrategy {
    /// Share of simulated rounds each arm's posterior draw wins.
    ThompsonSampling { rounds: usize },
    /// Best observed arm gets `1 − ε + ε/k`, every other arm `ε/k`.
    EpsilonGreedy { epsilon: f64 },
    /// All traffic to the arm with the highest upper confidence bound.
    /// An arm with no visitors has unbounded priority.
    Ucb,
}

/// Traffic split produced by a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BanditAllocation {
    pub strategy: BanditStrategy,
    /// Variation id to traffic share in `[0, 1]`.
    pub allocation: BTreeMap<String, f64>,
    pub recommended_variation_id: String,
}

impl BanditAllocation {
    pub fn total_share(&self) -> f64 {
        self.allocation.values().sum()
    }
}

impl BanditStrategy {
    pub fn tag(&self) -> &'static str {
        match self {
            BanditStrategy::ThompsonSampling { .. } => "thompson-sampling",
            BanditStrategy::EpsilonGreedy { .. } => "epsilon-greedy",
            BanditStrategy::Ucb => "ucb",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            BanditStrategy::ThompsonSampling { rounds } if rounds == 0 => {
                Err(EngineError::invalid("rounds", "must be at least 1"))
            }
            BanditStrategy::EpsilonGreedy { epsilon } if !(0.0..=1.0).contains(&epsilon) => Err(
                EngineError::invalid("epsilon", format!("must be in [0, 1], got {epsilon}")),
            ),
            _ => Ok(()),
        }
    }

    /// Split traffic across `variations`. Needs at least two arms with unique ids.
    pub fn allocate<R: Rng + ?Sized>(
        &self,
        variations: &[VariationSample],
        rng: &mut R,
    ) -> Result<BanditAllocation> {
        self.validate()?;
        validate_arms(variations, 2)?;

        // Each strategy picks its own winner; shares alone can tie (epsilon = 1).
        let (shares, best) = match *self {
            BanditStrategy::ThompsonSampling { rounds } => thompson_shares(variations, rounds, rng),
            BanditStrategy::EpsilonGreedy { epsilon } => epsilon_greedy_shares(variations, epsilon),
            BanditStrategy::Ucb => ucb_shares(variations),
        };

        let recommended_variation_id = variations[best].id.clone();
        let allocation = variations
            .iter()
            .zip(shares)
            .map(|(v, share)| (v.id.clone(), share))
            .collect();

        tracing::debug!(
            strategy = self.tag(),
            arms = variations.len(),
            recommended = %recommended_variation_id,
            "bandit allocation computed"
        );

        Ok(BanditAllocation {
            strategy: *self,
            allocation,
            recommended_variation_id,
        })
    }
}

fn thompson_shares<R: Rng + ?Sized>(
    variations: &[VariationSample],
    rounds: usize,
    rng: &mut R,
) -> (Vec<f64>, usize) {
    let mut wins = vec![0u64; variations.len()];
    let mut draws = vec![0.0f64; variations.len()];
    for _ in 0..rounds {
        for (slot, v) in draws.iter_mut().zip(variations) {
            *slot = beta_variate(rng, v.conversions as f64 + 1.0, v.failures() as f64 + 1.0);
        }
        if let Some(best) = argmax_first(draws.iter().copied()) {
            wins[best] += 1;
        }
    }
    let best = argmax_first(wins.iter().map(|&w| w as f64)).unwrap_or(0);
    let shares = wins
        .into_iter()
        .map(|w| w as f64 / rounds as f64)
        .collect();
    (shares, best)
}

fn epsilon_greedy_shares(variations: &[VariationSample], epsilon: f64) -> (Vec<f64>, usize) {
    let k = variations.len() as f64;
    let explore = epsilon / k;
    let best = argmax_first(variations.iter().map(VariationSample::conversion_rate)).unwrap_or(0);
    let shares = (0..variations.len())
        .map(|i| {
            if i == best {
                1.0 - epsilon + explore
            } else {
                explore
            }
        })
        .collect();
    (shares, best)
}

fn ucb_shares(variations: &[VariationSample]) -> (Vec<f64>, usize) {
    let total: f64 = variations.iter().map(|v| v.visitors as f64).sum();
    let ln_total = total.ln();
    let scores = variations.iter().map(|v| {
        if v.visitors == 0 {
            f64::INFINITY
        } else {
            v.conversion_rate() + (2.0 * ln_total / v.visitors as f64).sqrt()
        }
    });
    let best = argmax_first(scores).unwrap_or(0);
    let shares = (0..variations.len())
        .map(|i| if i == best { 1.0 } else { 0.0 })
        .collect();
    (shares, best)
}

impl fmt::Display for BanditStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BanditStrategy {
    type Err = EngineError;

    /// Parse a tag into a strategy with default tuning.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thompson-sampling" | "thompson" => Ok(BanditStrategy::ThompsonSampling {
                rounds: DEFAULT_THOMPSON_ROUNDS,
            }),
            "epsilon-greedy" => Ok(BanditStrategy::EpsilonGreedy {
                epsilon: DEFAULT_EPSILON,
            }),
            "ucb" => Ok(BanditStrategy::Ucb),
            other => Err(EngineError::invalid(
                "strategy",
                format!("unknown bandit strategy '{other}' (expected thompson-sampling, epsilon-greedy, or ucb)"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn arm(id: &str, n: u64, x: u64) -> VariationSample {
        VariationSample::new(id, id, n, x).expect("valid arm")
    }

    fn three_arms() -> Vec<VariationSample> {
        vec![arm("a", 1000, 50), arm("b", 1000, 65), arm("c", 1000, 45)]
    }

    #[test]
    fn thompson_favours_best_arm() {
        let strategy = BanditStrategy::ThompsonSampling { rounds: 1000 };
        let alloc = strategy
            .allocate(&three_arms(), &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(alloc.recommended_variation_id, "b");
        let b = alloc.allocation["b"];
        assert!(alloc.allocation.values().all(|&s| s <= b));
        assert!((alloc.total_share() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn epsilon_greedy_shares() {
        let strategy = BanditStrategy::EpsilonGreedy { epsilon: 0.1 };
        let alloc = strategy
            .allocate(&three_arms(), &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert!((alloc.allocation["b"] - (0.9 + 0.1 / 3.0)).abs() < 1e-12);
        assert!((alloc.allocation["a"] - 0.1 / 3.0).abs() < 1e-12);
        assert!((alloc.total_share() - 1.0).abs() < 1e-9);
        assert_eq!(alloc.recommended_variation_id, "b");
    }

    #[test]
    fn ucb_sends_everything_to_one_arm() {
        let alloc = BanditStrategy::Ucb
            .allocate(&three_arms(), &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(alloc.allocation["b"], 1.0);
        assert_eq!(alloc.allocation["a"], 0.0);
        assert_eq!(alloc.recommended_variation_id, "b");
    }

    #[test]
    fn ucb_prefers_unvisited_arm() {
        let arms = vec![arm("a", 1000, 900), arm("fresh", 0, 0), arm("late", 0, 0)];
        let alloc = BanditStrategy::Ucb
            .allocate(&arms, &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(alloc.recommended_variation_id, "fresh");
        assert_eq!(alloc.allocation["fresh"], 1.0);
        assert_eq!(alloc.allocation["late"], 0.0);
    }

    #[test]
    fn ties_go_to_first_arm() {
        let arms = vec![arm("x", 100, 10), arm("y", 100, 10)];
        for strategy in [BanditStrategy::EpsilonGreedy { epsilon: 0.2 }, BanditStrategy::Ucb] {
            let alloc = strategy
                .allocate(&arms, &mut StdRng::seed_from_u64(1))
                .unwrap();
            assert_eq!(alloc.recommended_variation_id, "x", "{strategy}");
        }
    }

    #[test]
    fn pure_exploration_still_recommends_best_rate() {
        let arms = vec![arm("a", 100, 1), arm("b", 100, 90)];
        let alloc = BanditStrategy::EpsilonGreedy { epsilon: 1.0 }
            .allocate(&arms, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(alloc.allocation["a"], 0.5);
        assert_eq!(alloc.allocation["b"], 0.5);
        assert_eq!(alloc.recommended_variation_id, "b");
    }

    #[test]
    fn thompson_recommends_most_wins() {
        let arms = vec![arm("a", 200, 2), arm("b", 200, 150), arm("c", 200, 20)];
        let alloc = BanditStrategy::ThompsonSampling { rounds: 1 }
            .allocate(&arms, &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(alloc.allocation["b"], 1.0);
        assert_eq!(alloc.recommended_variation_id, "b");
    }

    #[test]
    fn all_empty_arms_are_tolerated() {
        let arms = vec![arm("a", 0, 0), arm("b", 0, 0)];
        for strategy in [
            BanditStrategy::ThompsonSampling { rounds: 200 },
            BanditStrategy::EpsilonGreedy { epsilon: 0.1 },
            BanditStrategy::Ucb,
        ] {
            let alloc = strategy
                .allocate(&arms, &mut StdRng::seed_from_u64(3))
                .unwrap();
            assert!((alloc.total_share() - 1.0).abs() < 1e-9, "{strategy}");
            assert!(alloc.allocation.values().all(|s| s.is_finite()));
        }
    }

    #[test]
    fn huge_counts_do_not_overflow() {
        let n = u64::MAX / 2 + 1;
        let arms = vec![arm("a", n, n / 20), arm("b", n, n / 10)];
        for strategy in [
            BanditStrategy::ThompsonSampling { rounds: 50 },
            BanditStrategy::EpsilonGreedy { epsilon: 0.1 },
            BanditStrategy::Ucb,
        ] {
            let alloc = strategy
                .allocate(&arms, &mut StdRng::seed_from_u64(5))
                .unwrap();
            assert!((alloc.total_share() - 1.0).abs() < 1e-9, "{strategy}");
            assert_eq!(alloc.recommended_variation_id, "b", "{strategy}");
        }
    }

    #[test]
    fn rejects_bad_configuration() {
        let mut rng = StdRng::seed_from_u64(0);
        let arms = three_arms();
        assert!(BanditStrategy::ThompsonSampling { rounds: 0 }
            .allocate(&arms, &mut rng)
            .is_err());
        assert!(BanditStrategy::EpsilonGreedy { epsilon: 1.5 }
            .allocate(&arms, &mut rng)
            .is_err());
        assert!(BanditStrategy::Ucb.allocate(&arms[..1], &mut rng).is_err());
    }

    #[test]
    fn tags_round_trip() {
        for tag in ["thompson-sampling", "epsilon-greedy", "ucb"] {
            let strategy: BanditStrategy = tag.parse().unwrap();
            assert_eq!(strategy.to_string(), tag);
        }
        assert!("softmax".parse::<BanditStrategy>().is_err());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(BanditStrategy::EpsilonGreedy { epsilon: 0.2 }).unwrap();
        assert_eq!(json["kind"], "epsilon-greedy");
        assert_eq!(json["epsilon"], 0.2);
    }
}
