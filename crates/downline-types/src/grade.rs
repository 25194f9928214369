//! Rank tiers of the referral program.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Coarse rank tier gating progression through the program.
///
/// The ledger stores grades as plain integers 1 through 3. Anything else
/// (zero, missing, out of range) is read as the entry tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Grade {
    /// Grade 1, the tier every registered account starts in.
    #[default]
    Gold,
    /// Grade 2.
    Emerald,
    /// Grade 3, the final tier.
    Diamond,
}

impl Grade {
    /// All grades in ascending order.
    pub const ALL: [Self; 3] = [Self::Gold, Self::Emerald, Self::Diamond];

    /// Map a raw ledger value onto a grade, defaulting unknown values to
    /// [`Grade::Gold`].
    pub const fn from_raw(value: u128) -> Self {
        match value {
            2 => Self::Emerald,
            3 => Self::Diamond,
            _ => Self::Gold,
        }
    }

    /// The numeric grade as stored on the ledger (1, 2 or 3).
    pub const fn number(self) -> u8 {
        match self {
            Self::Gold => 1,
            Self::Emerald => 2,
            Self::Diamond => 3,
        }
    }

    /// Display name of the grade.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Emerald => "Emerald",
            Self::Diamond => "Diamond",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
