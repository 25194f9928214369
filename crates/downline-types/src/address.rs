//! Account identity: a 20-byte ledger address.
//!
//! Addresses are parsed from and rendered as `0x`-prefixed hex. The
//! all-zero address is the ledger's "no account" sentinel, used for the
//! sponsor slot of accounts that were never referred.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of bytes in an address.
pub const ADDRESS_LEN: usize = 20;

/// Errors produced when parsing an [`Address`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    /// The input did not contain exactly 40 hex digits after the prefix.
    #[error("address must have 40 hex digits, got {0}")]
    InvalidLength(usize),

    /// The input contained a non-hex character.
    #[error("address is not valid hex: {0}")]
    InvalidHex(String),
}

/// A ledger account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// The "none" sentinel (all zero bytes).
    pub const ZERO: Self = Self([0; ADDRESS_LEN]);

    /// Wrap raw address bytes.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Build an address whose low 8 bytes hold `value` (big-endian).
    ///
    /// Handy for synthetic graphs where identities are just numbered.
    pub fn from_low_u64_be(value: u64) -> Self {
        let mut bytes = [0_u8; ADDRESS_LEN];
        for (slot, byte) in bytes.iter_mut().rev().zip(value.to_le_bytes()) {
            *slot = byte;
        }
        Self(bytes)
    }

    /// Return the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Abbreviated form used in tables: `0x1234...abcd`.
    pub fn short(&self) -> String {
        let [a, b, .., y, z] = self.0;
        format!("0x{a:02x}{b:02x}...{y:02x}{z:02x}")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != ADDRESS_LEN.saturating_mul(2) {
            return Err(AddressParseError::InvalidLength(digits.len()));
        }

        let mut bytes = [0_u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
