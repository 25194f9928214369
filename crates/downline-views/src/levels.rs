//! Downline members grouped by depth.
//!
//! Only depths that actually hold members become groups. Stepping between
//! levels moves through those present depths, so a gap in the data is
//! skipped rather than shown as an empty level.

use std::collections::BTreeMap;
use std::ops::Bound;

use downline_types::TraversalNode;

/// Level selected when the grouping is empty.
const FIRST_LEVEL: u32 = 1;

/// Members grouped by depth, with a selected-level cursor.
#[derive(Debug, Clone)]
pub struct LevelGrouping<'a> {
    groups: BTreeMap<u32, Vec<&'a TraversalNode>>,
    selected: u32,
}

impl<'a> LevelGrouping<'a> {
    /// Group `nodes` by depth, keeping traversal order within each group.
    /// The lowest present depth is selected.
    pub fn new(nodes: &'a [TraversalNode]) -> Self {
        let mut groups: BTreeMap<u32, Vec<&'a TraversalNode>> = BTreeMap::new();
        for node in nodes {
            groups.entry(node.depth).or_default().push(node);
        }
        let selected = groups.keys().next().copied().unwrap_or(FIRST_LEVEL);
        Self { groups, selected }
    }

    /// Present depths in ascending order.
    pub fn levels(&self) -> Vec<u32> {
        self.groups.keys().copied().collect()
    }

    /// The selected depth.
    pub const fn selected_level(&self) -> u32 {
        self.selected
    }

    /// Members at `depth`, empty if the depth is absent.
    pub fn members(&self, depth: u32) -> &[&'a TraversalNode] {
        self.groups.get(&depth).map(Vec::as_slice).unwrap_or_default()
    }

    /// Members at the selected depth.
    pub fn current_members(&self) -> &[&'a TraversalNode] {
        self.members(self.selected)
    }

    /// Select `depth` if it holds members. Returns whether it was selected.
    pub fn select_level(&mut self, depth: u32) -> bool {
        if self.groups.contains_key(&depth) {
            self.selected = depth;
            true
        } else {
            false
        }
    }

    fn previous(&self) -> Option<u32> {
        self.groups.range(..self.selected).next_back().map(|(d, _)| *d)
    }

    fn following(&self) -> Option<u32> {
        self.groups
            .range((Bound::Excluded(self.selected), Bound::Unbounded))
            .next()
            .map(|(d, _)| *d)
    }

    /// Whether a shallower level exists.
    pub fn has_prev_level(&self) -> bool {
        self.previous().is_some()
    }

    /// Whether a deeper level exists.
    pub fn has_next_level(&self) -> bool {
        self.following().is_some()
    }

    /// Step to the next shallower present depth. No-op at the first level.
    pub fn prev_level(&mut self) -> bool {
        let Some(depth) = self.previous() else {
            return false;
        };
        self.selected = depth;
        true
    }

    /// Step to the next deeper present depth. No-op at the last level.
    pub fn next_level(&mut self) -> bool {
        let Some(depth) = self.following() else {
            return false;
        };
        self.selected = depth;
        true
    }

    /// `(depth, member count)` for every present depth, ascending.
    pub fn summary(&self) -> Vec<(u32, usize)> {
        self.groups
            .iter()
            .map(|(depth, members)| (*depth, members.len()))
            .collect()
    }

    /// Members across all levels.
    pub fn total_members(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Whether there are no members at all.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
