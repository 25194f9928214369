//! Account source trait and in-memory implementation.
//!
//! The engine reads the referral network through two lookups: the raw
//! account tuple of an identity, and the ordered list of its direct
//! referrals. The [`AccountSource`] trait abstracts where those come from --
//! a JSON-RPC ledger endpoint in production, an [`InMemorySource`] in tests
//! and demos.

use std::collections::{BTreeMap, BTreeSet};
use std::future::{self, Future};
use std::sync::Mutex;

use downline_types::{AccountSnapshot, Address, RawAccountInfo};

use crate::error::SourceError;

/// A read-only view of the referral ledger.
///
/// Both lookups are async and may fail independently. An empty child list
/// is a successful answer, not an error.
pub trait AccountSource {
    /// Fetch the raw account tuple for `identity`.
    fn account_info(
        &self,
        identity: Address,
    ) -> impl Future<Output = Result<RawAccountInfo, SourceError>> + Send;

    /// Fetch the ordered direct referrals of `identity`.
    fn children(
        &self,
        identity: Address,
    ) -> impl Future<Output = Result<Vec<Address>, SourceError>> + Send;
}

/// Per-identity call counters kept by [`InMemorySource`].
#[derive(Debug, Default)]
struct CallLog {
    account_info: BTreeMap<Address, usize>,
    children: BTreeMap<Address, usize>,
}

/// A synthetic referral graph held in memory.
///
/// Supports failure injection per identity and records every lookup so
/// tests can assert which identities were queried.
#[derive(Debug, Default)]
pub struct InMemorySource {
    accounts: BTreeMap<Address, RawAccountInfo>,
    referrals: BTreeMap<Address, Vec<Address>>,
    failing_accounts: BTreeSet<Address>,
    failing_children: BTreeSet<Address>,
    calls: Mutex<CallLog>,
}

impl InMemorySource {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph holding only the founder account.
    pub fn with_founder(founder: Address) -> Self {
        let mut source = Self::new();
        source.insert_snapshot(&AccountSnapshot {
            is_first_account: true,
            ..AccountSnapshot::unregistered(founder)
        });
        source
    }

    /// Store a raw tuple for `identity`, replacing any previous one.
    pub fn insert_raw(&mut self, identity: Address, raw: RawAccountInfo) {
        self.accounts.insert(identity, raw);
    }

    /// Store an account from a snapshot.
    pub fn insert_snapshot(&mut self, snapshot: &AccountSnapshot) {
        self.insert_raw(snapshot.address, RawAccountInfo::from(snapshot));
    }

    /// Register `child` as the next referral of `sponsor`.
    ///
    /// Creates a default account for `child` (sponsored by `sponsor`) when
    /// none exists yet.
    pub fn add_referral(&mut self, sponsor: Address, child: Address) {
        self.referrals.entry(sponsor).or_default().push(child);
        if !self.accounts.contains_key(&child) {
            self.insert_snapshot(&AccountSnapshot {
                sponsor,
                ..AccountSnapshot::unregistered(child)
            });
        }
    }

    /// Make every account-info lookup for `identity` fail.
    pub fn fail_account_info(&mut self, identity: Address) {
        self.failing_accounts.insert(identity);
    }

    /// Make every child-list lookup for `identity` fail.
    pub fn fail_children(&mut self, identity: Address) {
        self.failing_children.insert(identity);
    }

    /// Number of account-info lookups made for `identity`.
    pub fn account_info_calls(&self, identity: Address) -> usize {
        self.calls
            .lock()
            .map_or(0, |log| log.account_info.get(&identity).copied().unwrap_or(0))
    }

    /// Number of child-list lookups made for `identity`.
    pub fn children_calls(&self, identity: Address) -> usize {
        self.calls
            .lock()
            .map_or(0, |log| log.children.get(&identity).copied().unwrap_or(0))
    }

    /// Total lookups of either kind.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().map_or(0, |log| {
            log.account_info
                .values()
                .chain(log.children.values())
                .fold(0_usize, |acc, n| acc.saturating_add(*n))
        })
    }

    /// Every identity that has been looked up at least once.
    pub fn queried(&self) -> BTreeSet<Address> {
        self.calls.lock().map_or_else(
            |_| BTreeSet::new(),
            |log| {
                log.account_info
                    .keys()
                    .chain(log.children.keys())
                    .copied()
                    .collect()
            },
        )
    }

    /// Forget all recorded lookups.
    pub fn reset_calls(&self) {
        if let Ok(mut log) = self.calls.lock() {
            *log = CallLog::default();
        }
    }

    fn record(&self, identity: Address, children: bool) {
        if let Ok(mut log) = self.calls.lock() {
            let counters = if children {
                &mut log.children
            } else {
                &mut log.account_info
            };
            let count = counters.entry(identity).or_insert(0);
            *count = count.saturating_add(1);
        }
    }

    fn lookup_account(&self, identity: Address) -> Result<RawAccountInfo, SourceError> {
        self.record(identity, false);
        if self.failing_accounts.contains(&identity) {
            return Err(SourceError::Transport(format!(
                "injected account failure for {identity}"
            )));
        }
        self.accounts
            .get(&identity)
            .cloned()
            .ok_or(SourceError::NotFound(identity))
    }

    fn lookup_children(&self, identity: Address) -> Result<Vec<Address>, SourceError> {
        self.record(identity, true);
        if self.failing_children.contains(&identity) {
            return Err(SourceError::Transport(format!(
                "injected referral failure for {identity}"
            )));
        }
        Ok(self.referrals.get(&identity).cloned().unwrap_or_default())
    }
}

impl AccountSource for InMemorySource {
    fn account_info(
        &self,
        identity: Address,
    ) -> impl Future<Output = Result<RawAccountInfo, SourceError>> + Send {
        future::ready(self.lookup_account(identity))
    }

    fn children(
        &self,
        identity: Address,
    ) -> impl Future<Output = Result<Vec<Address>, SourceError>> + Send {
        future::ready(self.lookup_children(identity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    #[tokio::test]
    async fn referrals_keep_insertion_order() {
        let mut source = InMemorySource::with_founder(addr(1));
        source.add_referral(addr(1), addr(3));
        source.add_referral(addr(1), addr(2));

        let children = source.children(addr(1)).await.unwrap();
        assert_eq!(children, vec![addr(3), addr(2)]);
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let source = InMemorySource::new();
        let err = source.account_info(addr(9)).await.unwrap_err();
        assert_eq!(err, SourceError::NotFound(addr(9)));

        let children = source.children(addr(9)).await.unwrap();
        assert!(children.is_empty());
    }

    #[tokio::test]
    async fn injected_failures_and_counters() {
        let mut source = InMemorySource::with_founder(addr(1));
        source.fail_account_info(addr(1));
        source.fail_children(addr(1));

        assert!(source.account_info(addr(1)).await.is_err());
        assert!(source.account_info(addr(1)).await.is_err());
        assert!(source.children(addr(1)).await.is_err());

        assert_eq!(source.account_info_calls(addr(1)), 2);
        assert_eq!(source.children_calls(addr(1)), 1);
        assert_eq!(source.total_calls(), 3);
        assert_eq!(source.queried().len(), 1);

        source.reset_calls();
        assert_eq!(source.total_calls(), 0);
    }

    #[tokio::test]
    async fn added_referral_gets_sponsor() {
        let mut source = InMemorySource::with_founder(addr(1));
        source.add_referral(addr(1), addr(2));

        let raw = source.account_info(addr(2)).await.unwrap();
        assert_eq!(
            raw.get(1),
            Some(&downline_types::RawValue::Address(addr(1)))
        );
    }
}
