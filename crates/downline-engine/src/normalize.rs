//! Snapshot normalization: raw ledger tuple to [`AccountSnapshot`].
//!
//! Tuple layout (see [`RawAccountInfo`]):
//!
//! | Index | Field | Default when unset |
//! |-------|-------|--------------------|
//! | 0 | wallet | ignored, the queried identity is used |
//! | 1 | sponsor | [`Address::ZERO`] |
//! | 2 | grade | [`Grade::Gold`] |
//! | 3 | level | 0 |
//! | 4 | networkCount | 0 |
//! | 5 | totalEarnings | 0 |
//! | 6 | isFirstAccount | `false` |

use downline_types::{
    ACCOUNT_TUPLE_LEN, AccountSnapshot, Address, Earnings, Grade, RawAccountInfo, RawValue,
};

use crate::error::DownlineError;

const SPONSOR: usize = 1;
const GRADE: usize = 2;
const LEVEL: usize = 3;
const NETWORK_COUNT: usize = 4;
const TOTAL_EARNINGS: usize = 5;
const IS_FIRST_ACCOUNT: usize = 6;

/// Normalize the raw tuple fetched for `identity`.
///
/// Unset slots (empty, zero, `false`, zero address) take their defaults.
/// A set slot of the wrong kind, or an integer too wide for its field,
/// is rejected.
///
/// # Errors
///
/// [`DownlineError::IncompleteData`] when the tuple has fewer than seven
/// fields, [`DownlineError::MalformedField`] for a bad slot.
pub fn normalize(identity: Address, raw: &RawAccountInfo) -> Result<AccountSnapshot, DownlineError> {
    if raw.len() < ACCOUNT_TUPLE_LEN {
        return Err(DownlineError::IncompleteData {
            address: identity,
            len: raw.len(),
        });
    }

    let reader = SlotReader { identity, raw };

    Ok(AccountSnapshot {
        address: identity,
        sponsor: reader.address(SPONSOR)?.unwrap_or(Address::ZERO),
        grade: reader.uint(GRADE)?.map_or(Grade::Gold, Grade::from_raw),
        level: reader.uint64(LEVEL)?,
        network_count: reader.uint64(NETWORK_COUNT)?,
        total_earnings: reader
            .uint(TOTAL_EARNINGS)?
            .map_or(Earnings::ZERO, Earnings::from_units),
        is_first_account: reader.slot(IS_FIRST_ACCOUNT).is_truthy(),
    })
}

struct SlotReader<'a> {
    identity: Address,
    raw: &'a RawAccountInfo,
}

impl SlotReader<'_> {
    fn slot(&self, index: usize) -> RawValue {
        self.raw.get(index).copied().unwrap_or(RawValue::Null)
    }

    const fn malformed(&self, index: usize, expected: &'static str, value: RawValue) -> DownlineError {
        DownlineError::MalformedField {
            address: self.identity,
            index,
            expected,
            actual: value.kind(),
        }
    }

    fn address(&self, index: usize) -> Result<Option<Address>, DownlineError> {
        match self.slot(index) {
            value if !value.is_truthy() => Ok(None),
            RawValue::Address(addr) => Ok(Some(addr)),
            other => Err(self.malformed(index, "address", other)),
        }
    }

    fn uint(&self, index: usize) -> Result<Option<u128>, DownlineError> {
        match self.slot(index) {
            value if !value.is_truthy() => Ok(None),
            RawValue::Uint(n) => Ok(Some(n)),
            other => Err(self.malformed(index, "uint", other)),
        }
    }

    fn uint64(&self, index: usize) -> Result<u64, DownlineError> {
        let Some(value) = self.uint(index)? else {
            return Ok(0);
        };
        u64::try_from(value)
            .ok()
            .ok_or(DownlineError::MalformedField {
                address: self.identity,
                index,
                expected: "uint64",
                actual: "uint",
            })
    }
}
