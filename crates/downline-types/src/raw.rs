//! Raw per-account tuples as returned by the ledger.

use serde::{Deserialize, Serialize};

use crate::Address;

/// Minimum number of slots in an account tuple.
pub const ACCOUNT_TUPLE_LEN: usize = 7;

/// One slot of a raw account tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawValue {
    /// An account address.
    Address(Address),
    /// An unsigned integer (the ledger's `uint256`, narrowed to 128 bits).
    Uint(u128),
    /// A boolean flag.
    Bool(bool),
    /// A slot the source left empty.
    Null,
}

impl RawValue {
    /// Whether the value counts as set. Zero, `false`, the zero address and
    /// empty slots all fall back to defaults during normalization.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Address(addr) => !addr.is_zero(),
            Self::Uint(n) => *n != 0,
            Self::Bool(b) => *b,
            Self::Null => false,
        }
    }

    /// Short name of the slot kind, for error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Uint(_) => "uint",
            Self::Bool(_) => "bool",
            Self::Null => "null",
        }
    }
}

/// Ordered account tuple:
/// `[wallet, sponsor, grade, level, networkCount, totalEarnings, isFirstAccount]`.
///
/// Sources may append extra slots; only the first seven are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAccountInfo(pub Vec<RawValue>);

impl RawAccountInfo {
    /// Wrap an ordered list of slots.
    pub const fn new(values: Vec<RawValue>) -> Self {
        Self(values)
    }

    /// Number of slots.
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tuple has no slots.
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Slot at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&RawValue> {
        self.0.get(index)
    }
}

impl From<Vec<RawValue>> for RawAccountInfo {
    fn from(values: Vec<RawValue>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_ledger_defaults() {
        assert!(!RawValue::Null.is_truthy());
        assert!(!RawValue::Uint(0).is_truthy());
        assert!(!RawValue::Bool(false).is_truthy());
        assert!(!RawValue::Address(Address::ZERO).is_truthy());

        assert!(RawValue::Uint(3).is_truthy());
        assert!(RawValue::Bool(true).is_truthy());
        assert!(RawValue::Address(Address::from_low_u64_be(9)).is_truthy());
    }

    #[test]
    fn get_out_of_range_is_none() {
        let raw = RawAccountInfo::new(vec![RawValue::Null]);
        assert_eq!(raw.len(), 1);
        assert!(raw.get(1).is_none());
    }
}
