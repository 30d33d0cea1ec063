//! Commit-reveal exchange for a single fair random value.
//!
//! The committing side publishes only a MAC. Key and secret value stay inside
//! [`Committed`] with no accessor; the only way to reach them is
//! [`Committed::accept`], which takes the counterpart's value by move and
//! returns a [`Revealed`] exchange. [`Revealed::consume`] re-verifies the MAC
//! and combines both values into the agreed outcome.

pub mod scheme;

pub use scheme::{
    verify, verify_bytes, verify_hex, CommitmentScheme, HmacSha256, MacTag, SecretKey, KEY_SIZE,
    TAG_SIZE,
};

use crate::{combiner::combine, FairDiceError, Result};
use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Published commitment. Only the MAC and the range are observable.
pub struct Committed {
    range: u64,
    key: SecretKey,
    secret_value: u64,
    mac: MacTag,
}

impl Committed {
    /// Draw a secret in `0..range` and a fresh key from `rng`, then MAC the secret.
    pub fn generate<R>(range: u64, rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        if range == 0 {
            return Err(FairDiceError::invalid_range("range must be at least 1"));
        }

        let secret_value = rng.gen_range(0..range);
        let key = SecretKey::random(rng);
        let mac = HmacSha256::commit(&key, secret_value);

        tracing::debug!("Committed to a value in 0..{} with MAC {}", range, mac);
        Ok(Self {
            range,
            key,
            secret_value,
            mac,
        })
    }

    pub fn range(&self) -> u64 {
        self.range
    }

    pub fn mac(&self) -> &MacTag {
        &self.mac
    }

    /// Lock in the counterpart's value and open the commitment
    pub fn accept(self, counterpart_value: u64) -> Result<Revealed> {
        if counterpart_value >= self.range {
            return Err(FairDiceError::CounterpartOutOfRange {
                value: counterpart_value,
                range: self.range,
            });
        }

        tracing::debug!(
            "Counterpart value {} locked in for MAC {}",
            counterpart_value,
            self.mac
        );

        Ok(Revealed {
            range: self.range,
            key: self.key,
            secret_value: self.secret_value,
            mac: self.mac,
            counterpart_value,
        })
    }
}

impl std::fmt::Debug for Committed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Committed")
            .field("range", &self.range)
            .field("mac", &self.mac)
            .finish()
    }
}

/// Opened exchange: key and secret are public, the counterpart value is fixed
#[derive(Debug, Clone)]
pub struct Revealed {
    range: u64,
    key: SecretKey,
    secret_value: u64,
    mac: MacTag,
    counterpart_value: u64,
}

impl Revealed {
    /// Rebuild an opened exchange from published data, e.g. to audit a transcript
    pub fn from_parts(
        range: u64,
        key: SecretKey,
        secret_value: u64,
        mac: MacTag,
        counterpart_value: u64,
    ) -> Result<Self> {
        if range == 0 {
            return Err(FairDiceError::invalid_range("range must be at least 1"));
        }
        if counterpart_value >= range {
            return Err(FairDiceError::CounterpartOutOfRange {
                value: counterpart_value,
                range,
            });
        }
        Ok(Self {
            range,
            key,
            secret_value,
            mac,
            counterpart_value,
        })
    }

    pub fn range(&self) -> u64 {
        self.range
    }

    pub fn key(&self) -> &SecretKey {
        &self.key
    }

    pub fn secret_value(&self) -> u64 {
        self.secret_value
    }

    pub fn mac(&self) -> &MacTag {
        &self.mac
    }

    pub fn counterpart_value(&self) -> u64 {
        self.counterpart_value
    }

    pub fn verify(&self) -> bool {
        self.secret_value < self.range
            && HmacSha256::verify(&self.key, self.secret_value, &self.mac)
    }

    /// Verify the reveal, combine both values and close the exchange.
    ///
    /// The returned record is the only thing that outlives the exchange.
    pub fn consume(self, purpose: ExchangePurpose) -> Result<ExchangeRecord> {
        if !self.verify() {
            tracing::warn!(
                "Reveal of value {} does not match MAC {}",
                self.secret_value,
                self.mac
            );
            return Err(FairDiceError::protocol_violation(format!(
                "revealed value {} does not match MAC {}",
                self.secret_value, self.mac
            )));
        }

        let outcome = combine(self.secret_value, self.counterpart_value, self.range)?;
        tracing::debug!(
            "Combined {} + {} mod {} = {}",
            self.secret_value,
            self.counterpart_value,
            self.range,
            outcome
        );

        Ok(ExchangeRecord {
            purpose,
            range: self.range,
            mac: self.mac,
            key: self.key.to_hex(),
            secret_value: self.secret_value,
            counterpart_value: self.counterpart_value,
            outcome,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangePurpose {
    FirstMove,
    HumanRoll,
    ComputerRoll,
}

/// Published transcript entry of one consumed exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    pub purpose: ExchangePurpose,
    pub range: u64,
    pub mac: MacTag,
    pub key: String,
    pub secret_value: u64,
    pub counterpart_value: u64,
    pub outcome: u64,
}

impl ExchangeRecord {
    /// Replay the exchange and check the recorded outcome
    pub fn audit(&self) -> Result<()> {
        let key = SecretKey::from_hex(&self.key)?;
        let revealed = Revealed::from_parts(
            self.range,
            key,
            self.secret_value,
            self.mac,
            self.counterpart_value,
        )?;
        let replayed = revealed.consume(self.purpose)?;

        if replayed.outcome != self.outcome {
            return Err(FairDiceError::protocol_violation(format!(
                "recorded outcome {} but exchange combines to {}",
                self.outcome, replayed.outcome
            )));
        }
        Ok(())
    }
}
