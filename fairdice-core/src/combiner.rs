use crate::{FairDiceError, Result};

/// Agreed outcome of a commit-reveal exchange: `(secret + counterpart) mod range`.
///
/// For a fixed secret the map `counterpart -> outcome` is a bijection on
/// `0..range`, so neither side can bias the result once the secret is committed.
pub fn combine(secret_value: u64, counterpart_value: u64, range: u64) -> Result<u64> {
    if range == 0 {
        return Err(FairDiceError::invalid_range("range must be at least 1"));
    }
    if counterpart_value >= range {
        return Err(FairDiceError::CounterpartOutOfRange {
            value: counterpart_value,
            range,
        });
    }

    // widened so values near u64::MAX cannot overflow
    let sum = secret_value as u128 + counterpart_value as u128;
    Ok((sum % range as u128) as u64)
}
