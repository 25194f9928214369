//! Expandable sponsor-to-referral tree.
//!
//! The tree is rebuilt from the root snapshot and the pre-order node list
//! of a traversal. In pre-order, the parent of a node at depth `d` is the
//! most recent node seen at depth `d - 1`, so the shape can be recovered
//! from depths alone without another trip to the ledger.
//!
//! Nodes live in an arena indexed by [`NodeId`]; the root is always
//! [`DownlineTree::root`]. Expansion state is tracked per address.
//! Subtree sizes are computed once at build time; every child sits after
//! its parent in the arena, so one reverse pass settles them.

use std::collections::BTreeSet;

use downline_types::{AccountSnapshot, Address, TraversalNode};
use tracing::warn;

/// Index of a node in a [`DownlineTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// Configuration for [`DownlineTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeOptions {
    /// Addresses expanded initially. `None` expands only the root.
    pub initial_expanded: Option<BTreeSet<Address>>,
}

#[derive(Debug, Clone)]
struct TreeEntry<'a> {
    snapshot: &'a AccountSnapshot,
    depth: u32,
    children: Vec<NodeId>,
}

/// One line of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow<'a> {
    /// The node this row shows.
    pub id: NodeId,
    /// The account shown.
    pub snapshot: &'a AccountSnapshot,
    /// Distance from the root.
    pub depth: u32,
    /// Whether the node has any children.
    pub has_children: bool,
    /// Whether the node's children are shown below it.
    pub expanded: bool,
    /// Downline size badge; `None` for the root.
    pub downline: Option<usize>,
}

/// A nested view of one traversal with an expanded-address set.
#[derive(Debug, Clone)]
pub struct DownlineTree<'a> {
    entries: Vec<TreeEntry<'a>>,
    // sizes[i] is the subtree size of NodeId(i), itself included.
    sizes: Vec<usize>,
    expanded: BTreeSet<Address>,
}

impl<'a> DownlineTree<'a> {
    /// Rebuild the tree below `root` from pre-order `nodes`.
    ///
    /// A node whose depth skips a level has no parent in the list and is
    /// left out, along with anything nested below it.
    pub fn new(root: &'a AccountSnapshot, nodes: &'a [TraversalNode], options: TreeOptions) -> Self {
        let mut entries = vec![TreeEntry {
            snapshot: root,
            depth: 0,
            children: Vec::new(),
        }];
        // path[d] is the latest node seen at depth d.
        let mut path = vec![NodeId(0)];

        for node in nodes {
            let Ok(depth) = usize::try_from(node.depth) else {
                continue;
            };
            path.truncate(depth);
            if depth == 0 || path.len() != depth {
                warn!(address = %node.address(), depth = node.depth, "node has no parent in traversal order, skipping");
                continue;
            }

            let id = NodeId(entries.len());
            if let Some(parent) = path.last().and_then(|p| entries.get_mut(p.0)) {
                parent.children.push(id);
            }
            entries.push(TreeEntry {
                snapshot: &node.snapshot,
                depth: node.depth,
                children: Vec::new(),
            });
            path.push(id);
        }

        let sizes = subtree_sizes(&entries);
        let expanded = options
            .initial_expanded
            .unwrap_or_else(|| BTreeSet::from([root.address]));

        Self {
            entries,
            sizes,
            expanded,
        }
    }

    /// The root node.
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Address of the root.
    pub fn root_address(&self) -> Address {
        self.snapshot(self.root())
            .map_or(Address::ZERO, |s| s.address)
    }

    /// Number of nodes, root included.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: a tree holds at least its root.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The account at `id`.
    pub fn snapshot(&self, id: NodeId) -> Option<&'a AccountSnapshot> {
        self.entries.get(id.0).map(|e| e.snapshot)
    }

    /// Depth of `id` below the root.
    pub fn depth(&self, id: NodeId) -> Option<u32> {
        self.entries.get(id.0).map(|e| e.depth)
    }

    /// Direct children of `id` in referral order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.entries
            .get(id.0)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
    }

    /// First node (in pre-order) holding `address`.
    pub fn find(&self, address: Address) -> Option<NodeId> {
        self.entries
            .iter()
            .position(|e| e.snapshot.address == address)
            .map(NodeId)
    }

    /// Number of nodes in the subtree at `id`, itself included.
    pub fn count_subtree_size(&self, id: NodeId) -> usize {
        self.sizes.get(id.0).copied().unwrap_or(0)
    }

    /// Downline badge shown on a node: its descendant count. The root has
    /// no badge.
    pub fn downline_badge(&self, id: NodeId) -> Option<usize> {
        if id == self.root() {
            return None;
        }
        Some(self.count_subtree_size(id).saturating_sub(1))
    }

    /// Descendants of the root.
    pub fn total_downline(&self) -> usize {
        self.count_subtree_size(self.root()).saturating_sub(1)
    }

    /// Whether `address` is expanded.
    pub fn is_expanded(&self, address: Address) -> bool {
        self.expanded.contains(&address)
    }

    /// The expanded-address set.
    pub const fn expanded(&self) -> &BTreeSet<Address> {
        &self.expanded
    }

    /// Flip the expansion of `address`. Returns the new state.
    pub fn toggle(&mut self, address: Address) -> bool {
        if self.expanded.remove(&address) {
            false
        } else {
            self.expanded.insert(address);
            true
        }
    }

    /// Expand every node.
    pub fn expand_all(&mut self) {
        self.expanded = self.preorder().map(|id| self.address_of(id)).collect();
    }

    /// Collapse everything except the root.
    pub fn collapse_all(&mut self) {
        self.expanded = BTreeSet::from([self.root_address()]);
    }

    /// Visible rows in pre-order, descending only into expanded nodes.
    pub fn visible_rows(&self) -> Vec<TreeRow<'a>> {
        let mut rows = Vec::new();
        let mut stack = vec![self.root()];

        while let Some(id) = stack.pop() {
            let Some(entry) = self.entries.get(id.0) else {
                continue;
            };
            let has_children = !entry.children.is_empty();
            let expanded = self.is_expanded(entry.snapshot.address);

            rows.push(TreeRow {
                id,
                snapshot: entry.snapshot,
                depth: entry.depth,
                has_children,
                expanded,
                downline: self.downline_badge(id),
            });

            if has_children && expanded {
                stack.extend(entry.children.iter().rev().copied());
            }
        }
        rows
    }

    fn address_of(&self, id: NodeId) -> Address {
        self.snapshot(id).map_or(Address::ZERO, |s| s.address)
    }

    /// All node ids in pre-order, root first.
    fn preorder(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children(id).iter().rev().copied());
            Some(id)
        })
    }
}

/// Subtree size of every entry, walking the arena back to front.
fn subtree_sizes(entries: &[TreeEntry<'_>]) -> Vec<usize> {
    let mut sizes = vec![1_usize; entries.len()];
    for (i, entry) in entries.iter().enumerate().rev() {
        let below = entry
            .children
            .iter()
            .filter_map(|child| sizes.get(child.0))
            .fold(0_usize, |acc, size| acc.saturating_add(*size));
        if let Some(size) = sizes.get_mut(i) {
            *size = size.saturating_add(below);
        }
    }
    sizes
}
