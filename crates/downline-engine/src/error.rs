//! Error taxonomy for ledger access and traversal.
//!
//! [`SourceError`] describes why a single remote call failed. The engine
//! wraps it into [`DownlineError`], whose variant decides what happens to
//! the affected branch: unreadable accounts are dropped with their whole
//! subtree, unreadable child lists leave the account in place with no
//! children, and only a failure at the root reaches the caller.

use downline_types::Address;

/// A failed call against the ledger data source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The endpoint could not be reached or returned a non-success status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a JSON-RPC error (usually a revert).
    #[error("ledger call failed ({code}): {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message reported by the node.
        message: String,
    },

    /// The response could not be decoded.
    #[error("malformed ledger response: {0}")]
    Decode(String),

    /// The ledger has no record of the account.
    #[error("account {0} not found")]
    NotFound(Address),
}

/// Errors raised while building a downline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DownlineError {
    /// The account tuple had fewer fields than the ledger layout requires.
    #[error("incomplete account data for {address}: {len} fields, expected at least 7")]
    IncompleteData {
        /// The account being normalized.
        address: Address,
        /// Number of fields received.
        len: usize,
    },

    /// A tuple field held a value of the wrong kind or width.
    #[error("malformed field {index} for {address}: expected {expected}, got {actual}")]
    MalformedField {
        /// The account being normalized.
        address: Address,
        /// Position of the offending field.
        index: usize,
        /// What the layout expects at this position.
        expected: &'static str,
        /// What was found.
        actual: &'static str,
    },

    /// The account-info lookup failed.
    #[error("account {address} unavailable: {source}")]
    NodeUnavailable {
        /// The account that could not be read.
        address: Address,
        /// The underlying source failure.
        source: SourceError,
    },

    /// The child-list lookup failed.
    #[error("child list of {address} unavailable: {source}")]
    ChildListUnavailable {
        /// The account whose children could not be read.
        address: Address,
        /// The underlying source failure.
        source: SourceError,
    },

    /// The traversal root itself could not be read.
    #[error("root account {address} unavailable: {reason}")]
    RootUnavailable {
        /// The requested root.
        address: Address,
        /// Why the root snapshot failed.
        #[source]
        reason: Box<Self>,
    },
}

impl DownlineError {
    /// The account the error refers to.
    pub const fn address(&self) -> Address {
        match self {
            Self::IncompleteData { address, .. }
            | Self::MalformedField { address, .. }
            | Self::NodeUnavailable { address, .. }
            | Self::ChildListUnavailable { address, .. }
            | Self::RootUnavailable { address, .. } => *address,
        }
    }

    /// Whether this error drops the affected account and its subtree.
    pub const fn drops_branch(&self) -> bool {
        matches!(
            self,
            Self::IncompleteData { .. } | Self::MalformedField { .. } | Self::NodeUnavailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_policy_by_variant() {
        let address = Address::from_low_u64_be(3);
        let node = DownlineError::NodeUnavailable {
            address,
            source: SourceError::Transport("timeout".to_owned()),
        };
        let children = DownlineError::ChildListUnavailable {
            address,
            source: SourceError::Transport("timeout".to_owned()),
        };
        assert!(node.drops_branch());
        assert!(!children.drops_branch());
        assert!(DownlineError::IncompleteData { address, len: 2 }.drops_branch());
    }

    #[test]
    fn root_error_reports_cause() {
        let address = Address::from_low_u64_be(1);
        let err = DownlineError::RootUnavailable {
            address,
            reason: Box::new(DownlineError::IncompleteData { address, len: 0 }),
        };
        assert_eq!(err.address(), address);
        let text = err.to_string();
        assert!(text.contains("root account"));
        assert!(text.contains("0 fields"));
    }
}
