//! Normalized account state and traversal output nodes.

use serde::{Deserialize, Serialize};

use crate::{Address, Earnings, Grade, RawAccountInfo, RawValue};

/// The grade and level at which an account has collected everything the
/// program pays out.
const FINAL_GRADE: Grade = Grade::Diamond;
const FINAL_LEVEL: u64 = 9;

/// Canonical state of one account at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// The account's identity.
    pub address: Address,
    /// The referring account, or [`Address::ZERO`] if none.
    pub sponsor: Address,
    /// Current rank tier.
    pub grade: Grade,
    /// Progress counter within the current grade.
    pub level: u64,
    /// Total descendants as reported by the ledger.
    pub network_count: u64,
    /// Lifetime earnings.
    pub total_earnings: Earnings,
    /// Whether this is the network's founder account.
    pub is_first_account: bool,
}

impl AccountSnapshot {
    /// An account with default values and no sponsor.
    pub const fn unregistered(address: Address) -> Self {
        Self {
            address,
            sponsor: Address::ZERO,
            grade: Grade::Gold,
            level: 0,
            network_count: 0,
            total_earnings: Earnings::ZERO,
            is_first_account: false,
        }
    }

    /// Registered accounts have a sponsor, except the founder who has none.
    pub fn is_registered(&self) -> bool {
        !self.sponsor.is_zero() || self.is_first_account
    }

    /// Which grades are unlocked. Index 0 is unused and always `false`.
    pub fn grades_unlocked(&self) -> [bool; 4] {
        [
            false,
            true,
            self.grade >= Grade::Emerald,
            self.grade >= Grade::Diamond,
        ]
    }

    /// Number of unlocked grades (1 to 3).
    pub fn grades_unlocked_count(&self) -> usize {
        self.grades_unlocked().iter().skip(1).filter(|u| **u).count()
    }

    /// Whether the account reached the final grade and level.
    ///
    /// Exact match on level 9; an account past level 9 does not count.
    pub fn is_expired(&self) -> bool {
        self.grade == FINAL_GRADE && self.level == FINAL_LEVEL
    }
}

impl From<&AccountSnapshot> for RawAccountInfo {
    /// Lay the snapshot out in ledger tuple order.
    fn from(snapshot: &AccountSnapshot) -> Self {
        Self(vec![
            RawValue::Address(snapshot.address),
            RawValue::Address(snapshot.sponsor),
            RawValue::Uint(u128::from(snapshot.grade.number())),
            RawValue::Uint(u128::from(snapshot.level)),
            RawValue::Uint(u128::from(snapshot.network_count)),
            RawValue::Uint(snapshot.total_earnings.units()),
            RawValue::Bool(snapshot.is_first_account),
        ])
    }
}

/// One account in a traversal result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalNode {
    /// The account's state.
    pub snapshot: AccountSnapshot,
    /// Distance from the traversal root (always at least 1).
    pub depth: u32,
    /// The account whose child list led here. Display and grouping only.
    pub parent: Address,
}

impl TraversalNode {
    /// The node's identity.
    pub const fn address(&self) -> Address {
        self.snapshot.address
    }
}
