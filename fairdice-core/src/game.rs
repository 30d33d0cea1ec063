use crate::commitment::{Committed, ExchangePurpose, ExchangeRecord};
use crate::console::Console;
use crate::die::FACES;
use crate::strategy::SelectionStrategy;
use crate::{DiceSet, FairDiceError, Result};
use chrono::{DateTime, Utc};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Human,
    Computer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    HumanWins,
    ComputerWins,
    Draw,
}

impl Verdict {
    pub fn from_rolls(human: i64, computer: i64) -> Self {
        match human.cmp(&computer) {
            std::cmp::Ordering::Greater => Verdict::HumanWins,
            std::cmp::Ordering::Less => Verdict::ComputerWins,
            std::cmp::Ordering::Equal => Verdict::Draw,
        }
    }
}

/// Everything a third party needs to audit a finished match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub dice: DiceSet,
    pub first_mover: Side,
    pub human_die: usize,
    pub computer_die: usize,
    pub human_roll: i64,
    pub computer_roll: i64,
    pub verdict: Verdict,
    pub exchanges: Vec<ExchangeRecord>,
}

impl MatchReport {
    /// Re-verify every exchange, then check that the recorded first mover,
    /// rolls and verdict are exactly what the exchanges produce
    pub fn audit(&self) -> Result<()> {
        for exchange in &self.exchanges {
            exchange.audit()?;
        }

        if self.human_die == self.computer_die {
            return Err(FairDiceError::protocol_violation(format!(
                "both sides recorded with die {}",
                self.human_die
            )));
        }

        let roll_order = match self.first_mover {
            Side::Human => [ExchangePurpose::HumanRoll, ExchangePurpose::ComputerRoll],
            Side::Computer => [ExchangePurpose::ComputerRoll, ExchangePurpose::HumanRoll],
        };
        let expected = [
            (ExchangePurpose::FirstMove, 2),
            (roll_order[0], FACES as u64),
            (roll_order[1], FACES as u64),
        ];
        let recorded: Vec<(ExchangePurpose, u64)> = self
            .exchanges
            .iter()
            .map(|exchange| (exchange.purpose, exchange.range))
            .collect();
        if recorded != expected {
            return Err(FairDiceError::protocol_violation(format!(
                "exchanges {:?} do not follow {:?}",
                recorded, expected
            )));
        }

        let first_move = &self.exchanges[0];
        let first_mover = if first_move.outcome == 0 {
            Side::Human
        } else {
            Side::Computer
        };
        if first_mover != self.first_mover {
            return Err(FairDiceError::protocol_violation(format!(
                "first-move outcome {} gives {:?}, report says {:?}",
                first_move.outcome, first_mover, self.first_mover
            )));
        }

        for exchange in &self.exchanges[1..] {
            let (die, roll) = match exchange.purpose {
                ExchangePurpose::HumanRoll => (self.human_die, self.human_roll),
                _ => (self.computer_die, self.computer_roll),
            };
            let face = self.dice.get(die)?.face_at(exchange.outcome);
            if face != roll {
                return Err(FairDiceError::protocol_violation(format!(
                    "{:?} outcome {} lands on {} but report says {}",
                    exchange.purpose, exchange.outcome, face, roll
                )));
            }
        }

        let verdict = Verdict::from_rolls(self.human_roll, self.computer_roll);
        if verdict != self.verdict {
            return Err(FairDiceError::protocol_violation(format!(
                "rolls {} vs {} give {:?}, report says {:?}",
                self.human_roll, self.computer_roll, verdict, self.verdict
            )));
        }

        Ok(())
    }
}

/// One human-vs-computer match: first move, die selection, a fair roll per
/// side, comparison. Consumed by [`Match::play`].
pub struct Match<R> {
    id: Uuid,
    started_at: DateTime<Utc>,
    dice: DiceSet,
    strategy: Box<dyn SelectionStrategy>,
    rng: R,
    exchanges: Vec<ExchangeRecord>,
}

impl<R: RngCore + CryptoRng> Match<R> {
    pub fn new(dice: DiceSet, strategy: Box<dyn SelectionStrategy>, rng: R) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            dice,
            strategy,
            rng,
            exchanges: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn dice(&self) -> &DiceSet {
        &self.dice
    }

    pub fn play<C: Console + ?Sized>(mut self, console: &mut C) -> Result<MatchReport> {
        tracing::info!("Match {} started with {} dice", self.id, self.dice.len());

        let first_mover = self.decide_first_mover(console)?;
        let (human_die, computer_die) = self.select_dice(console, first_mover)?;

        let (human_roll, computer_roll) = match first_mover {
            Side::Human => {
                let human = self.fair_roll(console, Side::Human, human_die)?;
                let computer = self.fair_roll(console, Side::Computer, computer_die)?;
                (human, computer)
            }
            Side::Computer => {
                let computer = self.fair_roll(console, Side::Computer, computer_die)?;
                let human = self.fair_roll(console, Side::Human, human_die)?;
                (human, computer)
            }
        };

        let verdict = Verdict::from_rolls(human_roll, computer_roll);
        match verdict {
            Verdict::HumanWins => {
                console.announce(&format!("You win ({} > {})!", human_roll, computer_roll))
            }
            Verdict::ComputerWins => {
                console.announce(&format!("I win ({} < {})!", human_roll, computer_roll))
            }
            Verdict::Draw => console.announce(&format!(
                "It's a draw ({} = {})!",
                human_roll, computer_roll
            )),
        }

        tracing::info!("Match {} finished: {:?}", self.id, verdict);

        Ok(MatchReport {
            id: self.id,
            started_at: self.started_at,
            dice: self.dice,
            first_mover,
            human_die,
            computer_die,
            human_roll,
            computer_roll,
            verdict,
            exchanges: self.exchanges,
        })
    }

    /// Human guesses the computer's committed bit; a correct guess moves first
    fn decide_first_mover<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<Side> {
        console.announce("Let's determine who makes the first move.");
        let outcome = self.fair_exchange(
            console,
            ExchangePurpose::FirstMove,
            2,
            "Try to guess my selection (0 or 1)",
        )?;

        // guess == secret  <=>  (secret + guess) mod 2 == 0
        let first_mover = if outcome == 0 {
            console.announce("You guessed it, you make the first move.");
            Side::Human
        } else {
            console.announce("Wrong guess, I make the first move.");
            Side::Computer
        };

        tracing::debug!("Match {} first mover: {:?}", self.id, first_mover);
        Ok(first_mover)
    }

    /// Returns `(human_die, computer_die)` as indices into the dice set
    fn select_dice<C: Console + ?Sized>(
        &mut self,
        console: &mut C,
        first_mover: Side,
    ) -> Result<(usize, usize)> {
        match first_mover {
            Side::Human => {
                let human = self.prompt_die(console, None)?;
                let computer = self.strategy.respond(self.dice.dice(), human, &mut self.rng);
                self.check_strategy_pick(computer, Some(human))?;
                console.announce(&format!(
                    "You chose the [{}] dice. I choose the [{}] dice.",
                    self.dice.get(human)?,
                    self.dice.get(computer)?
                ));
                Ok((human, computer))
            }
            Side::Computer => {
                let computer = self.strategy.open(self.dice.dice(), &mut self.rng);
                self.check_strategy_pick(computer, None)?;
                console.announce(&format!(
                    "I choose the [{}] dice.",
                    self.dice.get(computer)?
                ));
                let human = self.prompt_die(console, Some(computer))?;
                console.announce(&format!("You chose the [{}] dice.", self.dice.get(human)?));
                Ok((human, computer))
            }
        }
    }

    /// Offer every die except `excluded`, numbered from 0, and map the answer back
    fn prompt_die<C: Console + ?Sized>(
        &self,
        console: &mut C,
        excluded: Option<usize>,
    ) -> Result<usize> {
        let options: Vec<usize> = (0..self.dice.len())
            .filter(|&i| Some(i) != excluded)
            .collect();

        console.announce("Choose your dice:");
        for (choice, &index) in options.iter().enumerate() {
            console.announce(&format!("{} - {}", choice, self.dice.get(index)?));
        }

        let choice = console.prompt_integer("Your selection", 0..options.len() as u64)?;
        options
            .get(choice as usize)
            .copied()
            .ok_or(FairDiceError::IndexOutOfRange {
                index: choice as usize,
                len: options.len(),
            })
    }

    fn check_strategy_pick(&self, pick: usize, taken: Option<usize>) -> Result<()> {
        if pick >= self.dice.len() || Some(pick) == taken {
            return Err(FairDiceError::config(format!(
                "selection strategy picked unavailable die {}",
                pick
            )));
        }
        tracing::debug!("Match {} computer picked die {}", self.id, pick);
        Ok(())
    }

    fn fair_roll<C: Console + ?Sized>(
        &mut self,
        console: &mut C,
        side: Side,
        die_index: usize,
    ) -> Result<i64> {
        let (purpose, intro) = match side {
            Side::Human => (ExchangePurpose::HumanRoll, "It's time for your roll."),
            Side::Computer => (ExchangePurpose::ComputerRoll, "It's time for my roll."),
        };
        console.announce(intro);

        let outcome = self.fair_exchange(
            console,
            purpose,
            FACES as u64,
            "Add your number modulo 6 (0-5)",
        )?;
        let face = self.dice.get(die_index)?.face_at(outcome);

        match side {
            Side::Human => console.announce(&format!("Your roll result is {}.", face)),
            Side::Computer => console.announce(&format!("My roll result is {}.", face)),
        }
        Ok(face)
    }

    /// Commit, collect the counterpart value, reveal, verify, combine
    fn fair_exchange<C: Console + ?Sized>(
        &mut self,
        console: &mut C,
        purpose: ExchangePurpose,
        range: u64,
        prompt: &str,
    ) -> Result<u64> {
        let committed = Committed::generate(range, &mut self.rng)?;
        console.announce(&format!(
            "I selected a random value in the range 0..{} (HMAC={}).",
            range - 1,
            committed.mac()
        ));

        let counterpart = console.prompt_integer(prompt, 0..range)?;
        let revealed = committed.accept(counterpart)?;
        console.announce(&format!(
            "My number is {} (KEY={}).",
            revealed.secret_value(),
            revealed.key().to_hex()
        ));

        let record = revealed.consume(purpose)?;
        console.announce(&format!(
            "The fair number generation result is {} + {} = {} (mod {}).",
            record.secret_value, record.counterpart_value, record.outcome, range
        ));

        let outcome = record.outcome;
        self.exchanges.push(record);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_from_rolls() {
        assert_eq!(Verdict::from_rolls(9, 8), Verdict::HumanWins);
        assert_eq!(Verdict::from_rolls(1, 8), Verdict::ComputerWins);
        assert_eq!(Verdict::from_rolls(-3, -3), Verdict::Draw);
    }
}
