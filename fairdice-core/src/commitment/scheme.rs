use crate::{FairDiceError, Result};
use hmac::{Hmac, Mac as _};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const KEY_SIZE: usize = 32;
pub const TAG_SIZE: usize = 32;

type HmacSha256Inner = Hmac<Sha256>;

/// Trait for commitment schemes
pub trait CommitmentScheme {
    type Key;
    type Tag;

    fn commit(key: &Self::Key, value: u64) -> Self::Tag;
    fn verify(key: &Self::Key, value: u64, tag: &Self::Tag) -> bool;
}

/// HMAC-SHA256 over the decimal string of the committed value
pub struct HmacSha256;

impl CommitmentScheme for HmacSha256 {
    type Key = SecretKey;
    type Tag = MacTag;

    fn commit(key: &SecretKey, value: u64) -> MacTag {
        let tag = keyed(key)
            .chain_update(value.to_string().as_bytes())
            .finalize()
            .into_bytes();
        let mut bytes = [0u8; TAG_SIZE];
        bytes.copy_from_slice(&tag);
        MacTag(bytes)
    }

    fn verify(key: &SecretKey, value: u64, tag: &MacTag) -> bool {
        keyed(key)
            .chain_update(value.to_string().as_bytes())
            .verify_slice(&tag.0)
            .is_ok()
    }
}

fn keyed(key: &SecretKey) -> HmacSha256Inner {
    <HmacSha256Inner as hmac::Mac>::new_from_slice(&key.0)
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"))
}

/// Random key for a single commitment, wiped on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_SIZE]);

impl SecretKey {
    pub fn random<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| FairDiceError::crypto(format!("key is not valid hex: {}", e)))?;
        let bytes: [u8; KEY_SIZE] = bytes.try_into().map_err(|v: Vec<u8>| {
            FairDiceError::crypto(format!(
                "key must be {} bytes, got {}",
                KEY_SIZE,
                v.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(..)")
    }
}

/// HMAC-SHA256 tag, displayed as lowercase hex
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MacTag([u8; TAG_SIZE]);

impl fmt::Debug for MacTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacTag({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for MacTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for MacTag {
    type Err = FairDiceError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| FairDiceError::crypto(format!("MAC is not valid hex: {}", e)))?;
        let bytes: [u8; TAG_SIZE] = bytes.try_into().map_err(|v: Vec<u8>| {
            FairDiceError::crypto(format!(
                "MAC must be {} bytes, got {}",
                TAG_SIZE,
                v.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl From<MacTag> for String {
    fn from(tag: MacTag) -> Self {
        tag.to_string()
    }
}

impl TryFrom<String> for MacTag {
    type Error = FairDiceError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Check a revealed `(key, value)` against a hex MAC published earlier.
///
/// Malformed hex never verifies.
pub fn verify(key: &SecretKey, secret_value: u64, mac: &str) -> bool {
    match mac.parse::<MacTag>() {
        Ok(tag) => verify_bytes(key, secret_value, &tag),
        Err(_) => false,
    }
}

/// Constant-time check against an already decoded tag
pub fn verify_bytes(key: &SecretKey, secret_value: u64, mac: &MacTag) -> bool {
    HmacSha256::verify(key, secret_value, mac)
}

/// Same as [`verify`] with the key also given as hex, as printed at reveal time
pub fn verify_hex(key: &str, secret_value: u64, mac: &str) -> Result<bool> {
    let key = SecretKey::from_hex(key)?;
    let tag: MacTag = mac.parse()?;
    Ok(verify_bytes(&key, secret_value, &tag))
}
