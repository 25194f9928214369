//! Minimal Solidity ABI codec for the two ledger calls.
//!
//! Only what the referral contract needs is supported: calldata with a
//! single `address` argument, a static tuple of 32-byte words, and a
//! dynamic `address[]`. Every word is big-endian and 32 bytes wide.

use downline_engine::SourceError;
use downline_types::{Address, RawAccountInfo, RawValue, ACCOUNT_TUPLE_LEN, ADDRESS_LEN};
use sha3::{Digest, Keccak256};

/// Width of one ABI word.
pub const WORD_LEN: usize = 32;

/// Width of a function selector.
pub const SELECTOR_LEN: usize = 4;

/// Signature of the account tuple getter.
pub const ACCOUNT_INFO_SIGNATURE: &str = "getAccountFullInfo(address)";

/// Signature of the direct referrals getter.
pub const REFERRALS_SIGNATURE: &str = "getReferrals(address)";

/// Bytes of a `uint256` word above the `u128` range.
const HIGH_HALF: usize = 16;

type Word = [u8; WORD_LEN];

/// First four bytes of the Keccak-256 hash of `signature`.
pub fn selector(signature: &str) -> [u8; SELECTOR_LEN] {
    let hash: [u8; 32] = Keccak256::digest(signature.as_bytes()).into();
    let [a, b, c, d, ..] = hash;
    [a, b, c, d]
}

/// Hex calldata for a call taking one `address` argument.
pub fn encode_address_call(selector: [u8; SELECTOR_LEN], argument: Address) -> String {
    let mut word = [0_u8; WORD_LEN];
    if let Some(tail) = word.last_chunk_mut::<ADDRESS_LEN>() {
        *tail = argument.0;
    }

    let mut data = Vec::with_capacity(SELECTOR_LEN + WORD_LEN);
    data.extend_from_slice(&selector);
    data.extend_from_slice(&word);
    format!("0x{}", hex::encode(data))
}

/// Decode the result of `getAccountFullInfo`.
///
/// The seven words are `(address, address, uint, uint, uint, uint, bool)`.
/// Integers wider than 128 bits are rejected.
pub fn decode_account_info(payload: &str) -> Result<RawAccountInfo, SourceError> {
    let words = words(payload)?;
    let Some(tuple) = words.get(..ACCOUNT_TUPLE_LEN) else {
        return Err(SourceError::Decode(format!(
            "account tuple needs {ACCOUNT_TUPLE_LEN} words, got {}",
            words.len()
        )));
    };

    tuple
        .iter()
        .enumerate()
        .map(|(index, word)| match index {
            0 | 1 => Ok(RawValue::Address(word_to_address(word))),
            6 => Ok(RawValue::Bool(word_to_uint(word)? != 0)),
            _ => word_to_uint(word).map(RawValue::Uint),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(RawAccountInfo::new)
}

/// Decode the result of `getReferrals`: a single dynamic `address[]`.
pub fn decode_address_array(payload: &str) -> Result<Vec<Address>, SourceError> {
    let words = words(payload)?;

    let offset = words
        .first()
        .ok_or_else(|| SourceError::Decode("empty address array payload".to_owned()))
        .and_then(word_to_usize)?;
    if offset % WORD_LEN != 0 {
        return Err(SourceError::Decode(format!(
            "array offset {offset} is not word aligned"
        )));
    }
    let length_index = offset / WORD_LEN;

    let length = words
        .get(length_index)
        .ok_or_else(|| SourceError::Decode(format!("array offset {offset} out of bounds")))
        .and_then(word_to_usize)?;

    let start = length_index.saturating_add(1);
    let items = start
        .checked_add(length)
        .and_then(|end| words.get(start..end))
        .ok_or_else(|| {
            SourceError::Decode(format!(
                "array of {length} items exceeds payload of {} words",
                words.len()
            ))
        })?;

    Ok(items.iter().map(word_to_address).collect())
}

/// Split a `0x`-prefixed hex payload into words.
fn words(payload: &str) -> Result<Vec<Word>, SourceError> {
    let digits = payload.strip_prefix("0x").unwrap_or(payload);
    let bytes = hex::decode(digits)
        .map_err(|e| SourceError::Decode(format!("payload is not hex: {e}")))?;

    let chunks = bytes.chunks_exact(WORD_LEN);
    if !chunks.remainder().is_empty() {
        return Err(SourceError::Decode(format!(
            "payload of {} bytes is not a whole number of words",
            bytes.len()
        )));
    }

    Ok(chunks
        .filter_map(|chunk| chunk.first_chunk::<WORD_LEN>().copied())
        .collect())
}

/// The low 20 bytes of a word.
fn word_to_address(word: &Word) -> Address {
    word.last_chunk::<ADDRESS_LEN>()
        .copied()
        .map(Address::new)
        .unwrap_or_default()
}

/// A `uint256` word narrowed to `u128`.
fn word_to_uint(word: &Word) -> Result<u128, SourceError> {
    let high = word.first_chunk::<HIGH_HALF>().copied().unwrap_or_default();
    if high.iter().any(|b| *b != 0) {
        return Err(SourceError::Decode(
            "integer does not fit in 128 bits".to_owned(),
        ));
    }
    let low = word.last_chunk::<HIGH_HALF>().copied().unwrap_or_default();
    Ok(u128::from_be_bytes(low))
}

fn word_to_usize(word: &Word) -> Result<usize, SourceError> {
    let value = word_to_uint(word)?;
    usize::try_from(value)
        .map_err(|e| SourceError::Decode(format!("length {value} out of range: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn word(value: u128) -> String {
        format!("{value:064x}")
    }

    fn address_word(address: Address) -> String {
        format!("{:0>64}", hex::encode(address.0))
    }

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    #[test]
    fn known_selectors() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn calldata_left_pads_argument() {
        let data = encode_address_call([0x70, 0xa0, 0x82, 0x31], addr(0xabcd));
        assert_eq!(data.len(), 2 + 2 * (SELECTOR_LEN + WORD_LEN));
        assert!(data.starts_with("0x70a08231000000000000000000000000"));
        assert!(data.ends_with("abcd"));
    }

    #[test]
    fn decodes_account_tuple() {
        let payload = format!(
            "0x{}{}{}{}{}{}{}",
            address_word(addr(7)),
            address_word(addr(1)),
            word(2),
            word(4),
            word(31),
            word(1_500_000_000_000_000_000),
            word(0),
        );
        let raw = decode_account_info(&payload).unwrap();

        assert_eq!(
            raw.0,
            vec![
                RawValue::Address(addr(7)),
                RawValue::Address(addr(1)),
                RawValue::Uint(2),
                RawValue::Uint(4),
                RawValue::Uint(31),
                RawValue::Uint(1_500_000_000_000_000_000),
                RawValue::Bool(false),
            ]
        );
    }

    #[test]
    fn short_account_tuple_is_rejected() {
        let payload = format!("0x{}{}", address_word(addr(7)), word(1));
        assert!(matches!(
            decode_account_info(&payload),
            Err(SourceError::Decode(_))
        ));
        assert!(matches!(decode_account_info("0x"), Err(SourceError::Decode(_))));
    }

    #[test]
    fn oversized_integer_is_rejected() {
        let huge = "f".repeat(64);
        let payload = format!(
            "0x{}{}{}{}{}{}{}",
            address_word(addr(7)),
            address_word(addr(1)),
            word(1),
            word(0),
            huge,
            word(0),
            word(0),
        );
        assert!(matches!(
            decode_account_info(&payload),
            Err(SourceError::Decode(_))
        ));
    }

    #[test]
    fn decodes_address_array() {
        let payload = format!(
            "0x{}{}{}{}",
            word(32),
            word(2),
            address_word(addr(5)),
            address_word(addr(6)),
        );
        assert_eq!(decode_address_array(&payload).unwrap(), vec![addr(5), addr(6)]);
    }

    #[test]
    fn decodes_empty_address_array() {
        let payload = format!("0x{}{}", word(32), word(0));
        assert!(decode_address_array(&payload).unwrap().is_empty());
    }

    #[test]
    fn truncated_address_array_is_rejected() {
        let payload = format!("0x{}{}{}", word(32), word(3), address_word(addr(5)));
        assert!(matches!(
            decode_address_array(&payload),
            Err(SourceError::Decode(_))
        ));
    }

    #[test]
    fn non_hex_payload_is_rejected() {
        assert!(matches!(
            decode_address_array("0xzz"),
            Err(SourceError::Decode(_))
        ));
        assert!(matches!(
            decode_address_array("0xabc"),
            Err(SourceError::Decode(_))
        ));
    }
}
