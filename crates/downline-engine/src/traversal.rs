//! Depth-bounded downline traversal.
//!
//! [`traverse`] walks the referral tree below a root identity using an
//! explicit worklist rather than recursion. Entries are processed one at a
//! time, so the remote source sees at most one call in flight and siblings
//! are visited strictly in order.
//!
//! # Failure policy
//!
//! | Failure | Effect |
//! |---------|--------|
//! | Root account lookup | [`DownlineError::RootUnavailable`], no result |
//! | Account lookup below root | account and its whole subtree dropped |
//! | Child-list lookup | account kept with no children |
//!
//! Per-node failures are logged and counted in the [`TraversalReport`];
//! they never reach the caller.
//!
//! # Ordering
//!
//! Output is pre-order depth-first by the child-list order the source
//! returns: every account precedes its descendants, and siblings appear in
//! list order. Given unchanged source data, repeated traversals produce
//! identical node lists.

use chrono::{DateTime, Utc};
use downline_types::{AccountSnapshot, Address, TraversalNode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::DownlineError;
use crate::fetch::{fetch_children, fetch_snapshot};
use crate::source::AccountSource;

/// Depth bound used when none is configured.
pub const DEFAULT_MAX_DEPTH: u32 = 15;

/// Counters describing one traversal run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalReport {
    /// Accounts successfully read, root included.
    pub visited: usize,
    /// Accounts whose lookup failed; each drops a whole subtree.
    pub dropped_branches: usize,
    /// Accounts kept without children because their child list failed.
    pub child_list_failures: usize,
}

/// The result of one traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Downline {
    /// Snapshot of the traversal root. Never repeated in `nodes`.
    pub root: AccountSnapshot,
    /// Descendants in pre-order, depths in `1..=max_depth`.
    pub nodes: Vec<TraversalNode>,
    /// The depth bound the traversal ran with.
    pub max_depth: u32,
    /// Per-run counters.
    pub report: TraversalReport,
    /// When the traversal finished.
    pub fetched_at: DateTime<Utc>,
}

impl Downline {
    /// The root identity.
    pub const fn root_address(&self) -> Address {
        self.root.address
    }

    /// Descendant nodes in traversal order.
    pub fn nodes(&self) -> &[TraversalNode] {
        &self.nodes
    }

    /// Number of descendants found.
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no descendants were found.
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Consume the result, keeping only the node list.
    pub fn into_nodes(self) -> Vec<TraversalNode> {
        self.nodes
    }
}

/// A worklist entry: an identity waiting to be read.
struct Pending {
    identity: Address,
    depth: u32,
    parent: Address,
}

/// Walk the downline of `root` to at most `max_depth` levels.
///
/// No identity deeper than `max_depth` is ever queried. Accounts at the
/// bound are read but their child lists are not requested.
///
/// # Errors
///
/// Only [`DownlineError::RootUnavailable`], when the root account itself
/// cannot be read.
pub async fn traverse<S: AccountSource>(
    source: &S,
    root: Address,
    max_depth: u32,
) -> Result<Downline, DownlineError> {
    info!(root = %root, max_depth, "starting downline traversal");

    let root_snapshot = fetch_snapshot(source, root).await.map_err(|error| {
        warn!(root = %root, %error, "root account unavailable");
        DownlineError::RootUnavailable {
            address: root,
            reason: Box::new(error),
        }
    })?;

    let mut report = TraversalReport {
        visited: 1,
        ..TraversalReport::default()
    };
    let mut nodes = Vec::new();
    let mut worklist = Vec::new();

    expand(source, &mut worklist, &mut report, root, 0, max_depth).await;

    while let Some(entry) = worklist.pop() {
        if entry.depth > max_depth {
            continue;
        }

        let snapshot = match fetch_snapshot(source, entry.identity).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(
                    address = %entry.identity,
                    depth = entry.depth,
                    %error,
                    "account unavailable, dropping branch"
                );
                report.dropped_branches = report.dropped_branches.saturating_add(1);
                continue;
            }
        };

        report.visited = report.visited.saturating_add(1);
        nodes.push(TraversalNode {
            snapshot,
            depth: entry.depth,
            parent: entry.parent,
        });

        expand(
            source,
            &mut worklist,
            &mut report,
            entry.identity,
            entry.depth,
            max_depth,
        )
        .await;
    }

    info!(
        root = %root,
        nodes = nodes.len(),
        dropped_branches = report.dropped_branches,
        child_list_failures = report.child_list_failures,
        "downline traversal complete"
    );

    Ok(Downline {
        root: root_snapshot,
        nodes,
        max_depth,
        report,
        fetched_at: Utc::now(),
    })
}

/// Queue the children of `identity` so they pop in list order.
///
/// A failed referral list keeps the account as a leaf and is counted in
/// `report.child_list_failures`.
async fn expand<S: AccountSource>(
    source: &S,
    worklist: &mut Vec<Pending>,
    report: &mut TraversalReport,
    identity: Address,
    depth: u32,
    max_depth: u32,
) {
    if depth >= max_depth {
        return;
    }
    let child_depth = depth.saturating_add(1);

    match fetch_children(source, identity).await {
        Ok(children) => {
            worklist.extend(children.into_iter().rev().map(|child| Pending {
                identity: child,
                depth: child_depth,
                parent: identity,
            }));
        }
        Err(error) => {
            warn!(address = %identity, depth, %error, "referrals unavailable, keeping account without children");
            report.child_list_failures = report.child_list_failures.saturating_add(1);
        }
    }
}
