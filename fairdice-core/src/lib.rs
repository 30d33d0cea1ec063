//! Provably fair dice for a human against the computer
//!
//! Every random value the computer contributes is committed with an
//! HMAC-SHA256 before the human supplies their own value, then revealed and
//! combined by modular addition, so neither side can bias the outcome.
//! Also computes exact pairwise odds for sets of non-transitive dice.

pub mod combiner;
pub mod commitment;
pub mod console;
pub mod die;
pub mod error;
pub mod game;
pub mod probability;
pub mod strategy;

pub use combiner::combine;
pub use commitment::{
    verify, verify_bytes, verify_hex, CommitmentScheme, Committed, ExchangePurpose, ExchangeRecord,
    HmacSha256, MacTag, Revealed, SecretKey,
};
pub use console::{Console, LineConsole};
pub use die::{DiceSet, Die};
pub use error::{ErrorKind, FairDiceError, Result};
pub use game::{Match, MatchReport, Side, Verdict};
pub use probability::{all_pairs, pairwise, ProbabilityMatrix, ProbabilityResult};
pub use strategy::{SelectionStrategy, StrategyKind};

use rand::{CryptoRng, RngCore};

/// Parse dice definitions and set up a match against the given strategy
pub fn create_match<S, R>(args: &[S], strategy: StrategyKind, rng: R) -> Result<Match<R>>
where
    S: AsRef<str>,
    R: RngCore + CryptoRng,
{
    let dice = DiceSet::parse(args)?;
    Ok(Match::new(dice, strategy.build(), rng))
}
