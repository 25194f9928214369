//! Per-node fetches: one account snapshot, one referral list.

use downline_types::{AccountSnapshot, Address};
use tracing::debug;

use crate::error::DownlineError;
use crate::normalize::normalize;
use crate::source::AccountSource;

/// Fetch and normalize the snapshot of `identity`.
///
/// # Errors
///
/// [`DownlineError::NodeUnavailable`] if the lookup fails, or the
/// normalizer's error if the tuple is unusable.
pub async fn fetch_snapshot<S: AccountSource>(
    source: &S,
    identity: Address,
) -> Result<AccountSnapshot, DownlineError> {
    debug!(address = %identity, "fetching account info");
    let raw = source
        .account_info(identity)
        .await
        .map_err(|source| DownlineError::NodeUnavailable {
            address: identity,
            source,
        })?;
    normalize(identity, &raw)
}

/// Fetch the ordered direct referrals of `identity`.
///
/// # Errors
///
/// [`DownlineError::ChildListUnavailable`] if the lookup fails.
pub async fn fetch_children<S: AccountSource>(
    source: &S,
    identity: Address,
) -> Result<Vec<Address>, DownlineError> {
    debug!(address = %identity, "fetching referrals");
    source
        .children(identity)
        .await
        .map_err(|source| DownlineError::ChildListUnavailable {
            address: identity,
            source,
        })
}
