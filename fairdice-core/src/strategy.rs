//! How the computer picks its die.

use crate::probability::pairwise;
use crate::{Die, FairDiceError, Result};
use rand::{seq::IteratorRandom, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Die-selection policy for the computer side.
///
/// `open` is used when the computer picks first, `respond` when the human
/// already holds die `taken`. Both must return an index into `dice`, and
/// `respond` must never return `taken`.
pub trait SelectionStrategy {
    fn open(&self, dice: &[Die], rng: &mut dyn RngCore) -> usize;
    fn respond(&self, dice: &[Die], taken: usize, rng: &mut dyn RngCore) -> usize;
}

/// Lowest index not already taken
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstRemaining;

impl SelectionStrategy for FirstRemaining {
    fn open(&self, _dice: &[Die], _rng: &mut dyn RngCore) -> usize {
        0
    }

    fn respond(&self, dice: &[Die], taken: usize, _rng: &mut dyn RngCore) -> usize {
        (0..dice.len()).find(|&i| i != taken).unwrap_or(0)
    }
}

/// Uniformly random among the dice not taken
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomRemaining;

impl SelectionStrategy for RandomRemaining {
    fn open(&self, dice: &[Die], rng: &mut dyn RngCore) -> usize {
        (0..dice.len()).choose(rng).unwrap_or(0)
    }

    fn respond(&self, dice: &[Die], taken: usize, rng: &mut dyn RngCore) -> usize {
        (0..dice.len())
            .filter(|&i| i != taken)
            .choose(rng)
            .unwrap_or(0)
    }
}

/// Exploits non-transitivity: answers with the die most likely to beat the
/// human's, and opens with the die whose worst matchup is the least bad.
#[derive(Debug, Default, Clone, Copy)]
pub struct BestResponse;

impl SelectionStrategy for BestResponse {
    fn open(&self, dice: &[Die], _rng: &mut dyn RngCore) -> usize {
        let worst_case = |i: usize| {
            dice.iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, other)| pairwise(&dice[i], other).win_a)
                .fold(f64::INFINITY, f64::min)
        };

        (0..dice.len())
            .max_by(|&a, &b| worst_case(a).total_cmp(&worst_case(b)).then(b.cmp(&a)))
            .unwrap_or(0)
    }

    fn respond(&self, dice: &[Die], taken: usize, _rng: &mut dyn RngCore) -> usize {
        let edge = |i: usize| {
            let r = pairwise(&dice[i], &dice[taken]);
            r.win_a - r.win_b
        };

        (0..dice.len())
            .filter(|&i| i != taken)
            .max_by(|&a, &b| edge(a).total_cmp(&edge(b)).then(b.cmp(&a)))
            .unwrap_or(0)
    }
}

/// Named strategies selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    First,
    Random,
    Best,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn SelectionStrategy> {
        match self {
            StrategyKind::First => Box::new(FirstRemaining),
            StrategyKind::Random => Box::new(RandomRemaining),
            StrategyKind::Best => Box::new(BestResponse),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::First => "first",
            StrategyKind::Random => "random",
            StrategyKind::Best => "best",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for StrategyKind {
    type Err = FairDiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(StrategyKind::First),
            "random" => Ok(StrategyKind::Random),
            "best" => Ok(StrategyKind::Best),
            other => Err(FairDiceError::config(format!(
                "unknown strategy '{}', expected first, random or best",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn classic() -> Vec<Die> {
        ["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect()
    }

    #[test]
    fn test_first_remaining() {
        let dice = classic();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(FirstRemaining.open(&dice, &mut rng), 0);
        assert_eq!(FirstRemaining.respond(&dice, 0, &mut rng), 1);
        assert_eq!(FirstRemaining.respond(&dice, 1, &mut rng), 0);
        assert_eq!(FirstRemaining.respond(&dice, 2, &mut rng), 0);
    }

    #[test]
    fn test_random_never_takes_the_human_die() {
        let dice = classic();
        let mut rng = StdRng::seed_from_u64(99);

        for taken in 0..dice.len() {
            for _ in 0..50 {
                let pick = RandomRemaining.respond(&dice, taken, &mut rng);
                assert_ne!(pick, taken);
                assert!(pick < dice.len());
            }
        }
    }

    #[test]
    fn test_best_response_beats_each_die() {
        // A beats B, B beats C, C beats A
        let dice = classic();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(BestResponse.respond(&dice, 0, &mut rng), 2);
        assert_eq!(BestResponse.respond(&dice, 1, &mut rng), 0);
        assert_eq!(BestResponse.respond(&dice, 2, &mut rng), 1);
    }

    #[test]
    fn test_best_opening_is_valid() {
        let dice = classic();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(BestResponse.open(&dice, &mut rng) < dice.len());
    }

    #[test]
    fn test_best_opening_prefers_dominant_die() {
        let dice: Vec<Die> = ["1,1,1,1,1,1", "9,9,9,9,9,9", "5,5,5,5,5,5"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(BestResponse.open(&dice, &mut rng), 1);
    }

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!("best".parse::<StrategyKind>().unwrap(), StrategyKind::Best);
        assert_eq!(" First ".parse::<StrategyKind>().unwrap(), StrategyKind::First);
        assert!("greedy".parse::<StrategyKind>().is_err());
        assert_eq!(StrategyKind::Random.to_string(), "random");
    }
}
