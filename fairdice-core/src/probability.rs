//! Exact win/loss/draw odds between dice by exhaustive face comparison.

use crate::{Die, FairDiceError, Result};
use serde::{Deserialize, Serialize};

/// Raw face-pair tallies for die A against die B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCounts {
    pub wins_a: u32,
    pub wins_b: u32,
    pub draws: u32,
}

impl PairCounts {
    pub fn total(&self) -> u32 {
        self.wins_a + self.wins_b + self.draws
    }

    pub fn swapped(&self) -> Self {
        Self {
            wins_a: self.wins_b,
            wins_b: self.wins_a,
            draws: self.draws,
        }
    }
}

/// Percentages rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityResult {
    pub win_a: f64,
    pub win_b: f64,
    pub draw: f64,
}

impl ProbabilityResult {
    fn from_counts(counts: &PairCounts) -> Self {
        let total = counts.total() as f64;
        let pct = |n: u32| ((n as f64 / total) * 10_000.0).round() / 100.0;

        Self {
            win_a: pct(counts.wins_a),
            win_b: pct(counts.wins_b),
            draw: pct(counts.draws),
        }
    }

    pub fn favours(&self) -> Favoured {
        if self.win_a > self.win_b {
            Favoured::A
        } else if self.win_b > self.win_a {
            Favoured::B
        } else {
            Favoured::Even
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Favoured {
    A,
    B,
    Even,
}

pub fn pair_counts(a: &Die, b: &Die) -> PairCounts {
    let mut counts = PairCounts {
        wins_a: 0,
        wins_b: 0,
        draws: 0,
    };

    for face_a in a.faces() {
        for face_b in b.faces() {
            match face_a.cmp(face_b) {
                std::cmp::Ordering::Greater => counts.wins_a += 1,
                std::cmp::Ordering::Less => counts.wins_b += 1,
                std::cmp::Ordering::Equal => counts.draws += 1,
            }
        }
    }

    counts
}

pub fn pairwise(a: &Die, b: &Die) -> ProbabilityResult {
    ProbabilityResult::from_counts(&pair_counts(a, b))
}

/// One upper-triangular cell: die `i` against die `j`, `i < j`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairwiseEntry {
    pub i: usize,
    pub j: usize,
    pub counts: PairCounts,
    pub result: ProbabilityResult,
}

/// Pairwise odds for every unordered pair of a dice list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityMatrix {
    size: usize,
    entries: Vec<PairwiseEntry>,
}

impl ProbabilityMatrix {
    pub fn size(&self) -> usize {
        self.size
    }

    /// Entries ordered by `(i, j)` with `i < j`
    pub fn entries(&self) -> &[PairwiseEntry] {
        &self.entries
    }

    /// Odds of die `i` against die `j` for any `i != j`
    pub fn get(&self, i: usize, j: usize) -> Option<ProbabilityResult> {
        if i == j || i >= self.size || j >= self.size {
            return None;
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let entry = self.entries.iter().find(|e| e.i == lo && e.j == hi)?;

        if i < j {
            Some(entry.result)
        } else {
            Some(ProbabilityResult::from_counts(&entry.counts.swapped()))
        }
    }

    /// Some `(a, b, c)` where a beats b, b beats c and c beats a
    pub fn find_cycle(&self) -> Option<(usize, usize, usize)> {
        let beats = |x: usize, y: usize| {
            self.get(x, y)
                .map_or(false, |r| r.favours() == Favoured::A)
        };

        for a in 0..self.size {
            for b in 0..self.size {
                if a == b || !beats(a, b) {
                    continue;
                }
                for c in 0..self.size {
                    if c != a && c != b && beats(b, c) && beats(c, a) {
                        return Some((a, b, c));
                    }
                }
            }
        }
        None
    }
}

pub fn all_pairs(dice: &[Die]) -> Result<ProbabilityMatrix> {
    if dice.len() < 2 {
        return Err(FairDiceError::TooFewDice {
            required: 2,
            provided: dice.len(),
        });
    }

    let mut entries = Vec::with_capacity(dice.len() * (dice.len() - 1) / 2);
    for i in 0..dice.len() {
        for j in (i + 1)..dice.len() {
            let counts = pair_counts(&dice[i], &dice[j]);
            entries.push(PairwiseEntry {
                i,
                j,
                counts,
                result: ProbabilityResult::from_counts(&counts),
            });
        }
    }

    Ok(ProbabilityMatrix {
        size: dice.len(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn die(s: &str) -> Die {
        s.parse().unwrap()
    }

    fn classic() -> Vec<Die> {
        vec![
            die("2,2,4,4,9,9"),
            die("1,1,6,6,8,8"),
            die("3,3,5,5,7,7"),
        ]
    }

    #[test]
    fn test_classic_pair_counts() {
        let dice = classic();
        let counts = pair_counts(&dice[0], &dice[1]);

        assert_eq!(counts.wins_a, 20);
        assert_eq!(counts.wins_b, 16);
        assert_eq!(counts.draws, 0);
        assert_eq!(counts.total(), 36);
    }

    #[test]
    fn test_classic_percentages() {
        let dice = classic();
        let result = pairwise(&dice[0], &dice[1]);

        assert_eq!(result.win_a, 55.56);
        assert_eq!(result.win_b, 44.44);
        assert_eq!(result.draw, 0.0);
    }

    #[test]
    fn test_draws_counted() {
        let a = die("1,2,3,4,5,6");
        let result = pairwise(&a, &a);

        assert_eq!(pair_counts(&a, &a).draws, 6);
        assert_eq!(result.draw, 16.67);
        assert_eq!(result.win_a, 41.67);
        assert_eq!(result.win_b, 41.67);
        assert_eq!(result.favours(), Favoured::Even);
    }

    #[test]
    fn test_all_pairs_upper_triangle() {
        let matrix = all_pairs(&classic()).unwrap();
        let cells: Vec<(usize, usize)> = matrix.entries().iter().map(|e| (e.i, e.j)).collect();

        assert_eq!(cells, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_matrix_get_is_symmetric() {
        let matrix = all_pairs(&classic()).unwrap();
        let ab = matrix.get(0, 1).unwrap();
        let ba = matrix.get(1, 0).unwrap();

        assert_eq!(ab.win_a, ba.win_b);
        assert_eq!(ab.draw, ba.draw);
        assert!(matrix.get(1, 1).is_none());
        assert!(matrix.get(0, 3).is_none());
    }

    #[test]
    fn test_classic_set_is_non_transitive() {
        let matrix = all_pairs(&classic()).unwrap();
        let (a, b, c) = matrix.find_cycle().unwrap();

        assert_eq!(matrix.get(a, b).unwrap().favours(), Favoured::A);
        assert_eq!(matrix.get(b, c).unwrap().favours(), Favoured::A);
        assert_eq!(matrix.get(c, a).unwrap().favours(), Favoured::A);
    }

    #[test]
    fn test_transitive_set_has_no_cycle() {
        let dice = vec![
            die("1,1,1,1,1,1"),
            die("2,2,2,2,2,2"),
            die("3,3,3,3,3,3"),
        ];
        assert!(all_pairs(&dice).unwrap().find_cycle().is_none());
    }

    #[test]
    fn test_all_pairs_needs_two() {
        assert!(all_pairs(&classic()[..1]).is_err());
        assert!(all_pairs(&classic()[..2]).is_ok());
    }

    fn arb_die() -> impl Strategy<Value = Die> {
        prop::collection::vec(-20i64..20, 6).prop_map(|faces| Die::new(faces).unwrap())
    }

    proptest! {
        #[test]
        fn prop_pairwise_symmetry(a in arb_die(), b in arb_die()) {
            let ab = pairwise(&a, &b);
            let ba = pairwise(&b, &a);
            prop_assert_eq!(ab.win_a, ba.win_b);
            prop_assert_eq!(ab.win_b, ba.win_a);
            prop_assert_eq!(ab.draw, ba.draw);
        }

        #[test]
        fn prop_percentages_sum_to_hundred(a in arb_die(), b in arb_die()) {
            let r = pairwise(&a, &b);
            prop_assert!((r.win_a + r.win_b + r.draw - 100.0).abs() <= 0.02);
            prop_assert_eq!(pair_counts(&a, &b).total(), 36);
        }
    }
}
