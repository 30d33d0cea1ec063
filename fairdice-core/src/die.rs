use crate::{FairDiceError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FACES: usize = 6;

/// Minimum number of dice definitions a match accepts
pub const MIN_DICE: usize = 3;

/// A six-sided die with arbitrary integer faces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    faces: [i64; FACES],
}

impl Die {
    pub fn new(faces: Vec<i64>) -> Result<Self> {
        let faces: [i64; FACES] = faces.try_into().map_err(|v: Vec<i64>| {
            FairDiceError::invalid_die(format!(
                "expected exactly {} faces, got {}",
                FACES,
                v.len()
            ))
        })?;
        Ok(Self { faces })
    }

    pub fn faces(&self) -> &[i64; FACES] {
        &self.faces
    }

    /// Uniform face for non-adversarial use. Fair rolls go through
    /// [`face_at`](Self::face_at) with a combined outcome instead.
    pub fn draw_random_face<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        self.faces[rng.gen_range(0..FACES)]
    }

    /// Face lookup; indices wrap modulo the face count.
    pub fn face_at(&self, index: u64) -> i64 {
        self.faces[(index % FACES as u64) as usize]
    }
}

impl FromStr for Die {
    type Err = FairDiceError;

    fn from_str(s: &str) -> Result<Self> {
        let faces = s
            .split(',')
            .map(|token| {
                let token = token.trim();
                token.parse::<i64>().map_err(|_| {
                    FairDiceError::invalid_die(format!("'{}' is not an integer in '{}'", token, s))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(faces).map_err(|e| match e {
            FairDiceError::InvalidDie(msg) => {
                FairDiceError::invalid_die(format!("{} in '{}'", msg, s))
            }
            other => other,
        })
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.faces.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", faces.join(","))
    }
}

/// The validated, immutable collection of dice for a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceSet {
    dice: Vec<Die>,
}

impl DiceSet {
    pub fn new(dice: Vec<Die>) -> Result<Self> {
        if dice.len() < MIN_DICE {
            return Err(FairDiceError::TooFewDice {
                required: MIN_DICE,
                provided: dice.len(),
            });
        }
        Ok(Self { dice })
    }

    /// Parse one die per argument, e.g. `["2,2,4,4,9,9", "1,1,6,6,8,8", ...]`
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.len() < MIN_DICE {
            return Err(FairDiceError::TooFewDice {
                required: MIN_DICE,
                provided: args.len(),
            });
        }

        let dice = args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                arg.as_ref().parse::<Die>().map_err(|e| match e {
                    FairDiceError::InvalidDie(msg) => {
                        FairDiceError::invalid_die(format!("die #{}: {}", i + 1, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Parsed {} dice", dice.len());
        Self::new(dice)
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Die> {
        self.dice.get(index).ok_or(FairDiceError::IndexOutOfRange {
            index,
            len: self.dice.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_parse_die() {
        let die: Die = "2, 2,4 ,4,9,9".parse().unwrap();
        assert_eq!(die.faces(), &[2, 2, 4, 4, 9, 9]);
        assert_eq!(die.to_string(), "2,2,4,4,9,9");
    }

    #[test]
    fn test_negative_faces_allowed() {
        let die: Die = "-1,0,1,-1,0,1".parse().unwrap();
        assert_eq!(die.face_at(0), -1);
    }

    #[test]
    fn test_five_values_rejected() {
        let err = "1,2,3,4,5".parse::<Die>().unwrap_err();
        assert!(matches!(err, FairDiceError::InvalidDie(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_non_integer_rejected() {
        assert!("1,2,3,4,5,x".parse::<Die>().is_err());
        assert!("1,2,3,4,5,6.5".parse::<Die>().is_err());
        assert!("1,2,3,4,5,".parse::<Die>().is_err());
        assert!("".parse::<Die>().is_err());
    }

    #[test]
    fn test_seven_values_rejected() {
        assert!(Die::new(vec![1, 2, 3, 4, 5, 6, 7]).is_err());
    }

    #[test]
    fn test_face_at_wraps() {
        let die = Die::new(vec![10, 20, 30, 40, 50, 60]).unwrap();
        assert_eq!(die.face_at(0), 10);
        assert_eq!(die.face_at(5), 60);
        assert_eq!(die.face_at(6), 10);
        assert_eq!(die.face_at(13), 20);
    }

    #[test]
    fn test_draw_random_face_is_a_face() {
        let die = Die::new(vec![1, 1, 6, 6, 8, 8]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let face = die.draw_random_face(&mut rng);
            assert!(die.faces().contains(&face));
        }
    }

    #[test]
    fn test_draw_random_face_is_uniform() {
        // distinct faces so every draw identifies its position
        let die = Die::new(vec![10, 20, 30, 40, 50, 60]).unwrap();
        let samples = 60_000u64;
        let expected = samples as f64 / FACES as f64;

        for seed in [1, 2, 3] {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut counts = [0u64; FACES];
            for _ in 0..samples {
                let face = die.draw_random_face(&mut rng);
                counts[(face / 10 - 1) as usize] += 1;
            }

            let chi_square: f64 = counts
                .iter()
                .map(|&c| (c as f64 - expected).powi(2) / expected)
                .sum();
            // 5 degrees of freedom, p = 0.001
            assert!(chi_square < 20.52, "seed {}: {:?}", seed, counts);
        }
    }

    #[test]
    fn test_dice_set_requires_three() {
        let err = DiceSet::parse(&["2,2,4,4,9,9", "1,1,6,6,8,8"]).unwrap_err();
        assert!(matches!(
            err,
            FairDiceError::TooFewDice {
                required: 3,
                provided: 2
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_dice_set_reports_position() {
        let err = DiceSet::parse(&["2,2,4,4,9,9", "1,1,6,6,8,8", "1,2,3,4,5"]).unwrap_err();
        assert!(err.to_string().contains("die #3"));
    }

    #[test]
    fn test_dice_set_get() {
        let set = DiceSet::parse(&["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"]).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(2).unwrap().face_at(0), 3);
        assert!(matches!(
            set.get(3),
            Err(FairDiceError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }
}
