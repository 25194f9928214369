//! Fixed-point token amounts.
//!
//! The ledger reports earnings in base units scaled by 10^18. Display
//! conversion goes through [`Decimal`] so rounding is exact; no floats.

use core::fmt;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Base units per whole token.
pub const UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Decimal places used when converting base units to tokens.
const TOKEN_DECIMALS: u32 = 18;

/// Decimal places shown to users.
const DISPLAY_DECIMALS: u32 = 2;

/// An unsigned token amount in base units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Earnings(pub u128);

impl Earnings {
    /// Zero earnings.
    pub const ZERO: Self = Self(0);

    /// Wrap an amount in base units.
    pub const fn from_units(units: u128) -> Self {
        Self(units)
    }

    /// Build an amount from whole tokens, saturating on overflow.
    pub const fn from_tokens(tokens: u64) -> Self {
        Self((tokens as u128).saturating_mul(UNITS_PER_TOKEN))
    }

    /// The raw amount in base units.
    pub const fn units(self) -> u128 {
        self.0
    }

    /// Whole tokens rounded to two decimals, ties away from zero.
    ///
    /// The fractional part is rounded on its own before the whole part is
    /// added back, which keeps the result exact for every `u128` input.
    pub fn to_display(self) -> Decimal {
        let whole = self.0.checked_div(UNITS_PER_TOKEN).unwrap_or(0);
        let remainder = self.0.checked_rem(UNITS_PER_TOKEN).unwrap_or(0);

        let whole = Decimal::from_u128(whole).unwrap_or(Decimal::MAX);
        let mut fraction = Decimal::from(u64::try_from(remainder).unwrap_or(0));
        if fraction.set_scale(TOKEN_DECIMALS).is_err() {
            return whole;
        }
        let fraction =
            fraction.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);

        whole.checked_add(fraction).unwrap_or(whole)
    }
}

impl fmt::Display for Earnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_display())
    }
}
