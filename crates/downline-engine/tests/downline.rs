//! Integration tests for traversal, the load-state controller and the
//! views built on its output.
//!
//! Every test runs against an [`InMemorySource`] graph, so no network is
//! involved and lookups can be counted per identity.

#![allow(clippy::unwrap_used)]

use downline_engine::{
    traverse, DownlineController, InMemorySource, LoadState, DEFAULT_MAX_DEPTH,
};
use downline_types::{AccountSnapshot, Address, Earnings, Grade, TraversalNode};
use downline_views::{DownlineTree, FlatList, FlatListOptions, LevelGrouping, TreeOptions};

fn addr(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

/// Full binary tree below `addr(1)`: node `n` refers `2n` and `2n + 1`.
/// `levels` counts the levels below the root.
fn binary_tree(levels: u32) -> InMemorySource {
    let mut source = InMemorySource::with_founder(addr(1));
    let last_parent = (1_u64 << levels) - 1;
    for n in 1..=last_parent {
        source.add_referral(addr(n), addr(2 * n));
        source.add_referral(addr(n), addr(2 * n + 1));
    }
    source
}

/// A single line `1 -> 2 -> ... -> length`.
fn chain(length: u64) -> InMemorySource {
    let mut source = InMemorySource::with_founder(addr(1));
    for n in 1..length {
        source.add_referral(addr(n), addr(n + 1));
    }
    source
}

/// The founder with `count` direct referrals.
fn star(count: u64) -> InMemorySource {
    let mut source = InMemorySource::with_founder(addr(1));
    for n in 2..=count + 1 {
        source.add_referral(addr(1), addr(n));
    }
    source
}

fn addresses(nodes: &[TraversalNode]) -> Vec<Address> {
    nodes.iter().map(TraversalNode::address).collect()
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_descendant_found_with_depth() {
    let source = binary_tree(3);
    let downline = traverse(&source, addr(1), DEFAULT_MAX_DEPTH).await.unwrap();

    // 15 identities, root excluded.
    assert_eq!(downline.len(), 14);
    for node in downline.nodes() {
        let n = (2..=15).find(|n| addr(*n) == node.address()).unwrap();
        assert_eq!(node.depth, n.ilog2());
        assert_eq!(node.parent, addr(n / 2));
    }
}

#[tokio::test]
async fn every_account_precedes_its_descendants() {
    let source = binary_tree(3);
    let downline = traverse(&source, addr(1), DEFAULT_MAX_DEPTH).await.unwrap();
    let order = addresses(downline.nodes());

    for (index, node) in downline.nodes().iter().enumerate() {
        if node.parent == addr(1) {
            continue;
        }
        let parent_index = order.iter().position(|a| *a == node.parent).unwrap();
        assert!(parent_index < index);
    }
}

#[tokio::test]
async fn nothing_beyond_depth_bound_is_queried() {
    let source = chain(10);
    let downline = traverse(&source, addr(1), 4).await.unwrap();

    assert_eq!(addresses(downline.nodes()), vec![addr(2), addr(3), addr(4), addr(5)]);
    assert!(downline.nodes().iter().all(|n| n.depth <= 4));
    for deep in 6..=10 {
        assert!(!source.queried().contains(&addr(deep)));
    }
}

#[tokio::test]
async fn failed_account_drops_subtree_keeps_siblings() {
    let mut source = binary_tree(2);
    source.fail_account_info(addr(2));

    let downline = traverse(&source, addr(1), DEFAULT_MAX_DEPTH).await.unwrap();
    assert_eq!(
        addresses(downline.nodes()),
        vec![addr(3), addr(6), addr(7)]
    );
    assert_eq!(downline.report.dropped_branches, 1);
    assert_eq!(source.account_info_calls(addr(4)), 0);
    assert_eq!(source.account_info_calls(addr(5)), 0);
}

#[tokio::test]
async fn failed_child_list_keeps_account() {
    let mut source = binary_tree(2);
    source.fail_children(addr(2));

    let downline = traverse(&source, addr(1), DEFAULT_MAX_DEPTH).await.unwrap();
    assert_eq!(
        addresses(downline.nodes()),
        vec![addr(2), addr(3), addr(6), addr(7)]
    );
    assert_eq!(downline.report.child_list_failures, 1);
}

#[tokio::test]
async fn snapshots_carry_ledger_values() {
    let mut source = InMemorySource::with_founder(addr(1));
    source.add_referral(addr(1), addr(2));
    source.insert_snapshot(&AccountSnapshot {
        address: addr(2),
        sponsor: addr(1),
        grade: Grade::Diamond,
        level: 9,
        network_count: 42,
        total_earnings: Earnings::from_tokens(150),
        is_first_account: false,
    });

    let downline = traverse(&source, addr(1), DEFAULT_MAX_DEPTH).await.unwrap();
    let member = &downline.nodes().first().unwrap().snapshot;
    assert_eq!(member.grade, Grade::Diamond);
    assert_eq!(member.network_count, 42);
    assert_eq!(member.total_earnings.to_string(), "150.00");
    assert!(member.is_expired());
    assert!(downline.root.is_first_account);
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reload_is_idempotent_on_unchanged_graph() {
    let mut ctl = DownlineController::new(binary_tree(3), addr(1), DEFAULT_MAX_DEPTH);

    assert_eq!(ctl.ensure_loaded().await, LoadState::Loaded);
    let first = ctl.nodes().to_vec();

    assert_eq!(ctl.reload().await, LoadState::Loaded);
    assert_eq!(ctl.nodes(), first.as_slice());
}

#[tokio::test]
async fn repeated_ensure_loaded_does_not_refetch() {
    let mut ctl = DownlineController::new(binary_tree(2), addr(1), DEFAULT_MAX_DEPTH);
    ctl.ensure_loaded().await;
    let calls = ctl.source().total_calls();

    for _ in 0..3 {
        ctl.ensure_loaded().await;
    }
    assert_eq!(ctl.source().total_calls(), calls);
}

// ---------------------------------------------------------------------------
// Views over one traversal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn flat_list_pages() {
    let source = star(25);
    let downline = traverse(&source, addr(1), DEFAULT_MAX_DEPTH).await.unwrap();
    let mut list = FlatList::new(downline.nodes(), FlatListOptions::default());

    assert_eq!(list.total_pages(), 3);
    assert!(list.go_to_page(3));
    assert_eq!(list.current_items().len(), 5);

    assert!(!list.go_to_page(0));
    assert_eq!(list.page(), 3);
    assert!(!list.go_to_page(4));
    assert_eq!(list.page(), 3);
}

#[tokio::test]
async fn level_grouping_of_binary_tree() {
    let source = binary_tree(2);
    let downline = traverse(&source, addr(1), DEFAULT_MAX_DEPTH).await.unwrap();
    let grouping = LevelGrouping::new(downline.nodes());

    assert_eq!(grouping.members(1).len(), 2);
    assert_eq!(grouping.members(2).len(), 4);
    assert_eq!(grouping.selected_level(), 1);
}

#[tokio::test]
async fn views_agree_on_member_count() {
    let mut source = binary_tree(3);
    source.fail_account_info(addr(5));
    source.fail_children(addr(6));

    let downline = traverse(&source, addr(1), DEFAULT_MAX_DEPTH).await.unwrap();
    let list = FlatList::new(downline.nodes(), FlatListOptions::default());
    let grouping = LevelGrouping::new(downline.nodes());
    let mut tree = DownlineTree::new(&downline.root, downline.nodes(), TreeOptions::default());

    assert_eq!(tree.count_subtree_size(tree.root()) - 1, list.len());
    assert_eq!(grouping.total_members(), list.len());

    tree.expand_all();
    let rows = tree.visible_rows();
    assert_eq!(rows.len(), list.len() + 1);
    assert_eq!(
        rows.iter().skip(1).map(|r| r.snapshot.address).collect::<Vec<_>>(),
        addresses(downline.nodes())
    );
}
