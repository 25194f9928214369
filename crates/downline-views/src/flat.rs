//! Flat paginated list of downline members.
//!
//! Pages are 1-based. Page `n` shows items `[(n-1)*size, n*size)` in
//! traversal order. Requests for pages outside `1..=total_pages` are
//! ignored rather than clamped, so an out-of-range click leaves the view
//! where it was.

use downline_types::TraversalNode;
use serde::{Deserialize, Serialize};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Pages shown on each side of the current page in [`FlatList::page_window`].
const WINDOW_RADIUS: usize = 2;

/// Configuration for [`FlatList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatListOptions {
    /// Members per page. Zero is treated as one.
    pub page_size: usize,
}

impl Default for FlatListOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One entry of a pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLink {
    /// A page number.
    Page(usize),
    /// A gap between non-adjacent page numbers.
    Ellipsis,
}

/// A paginated cursor over the traversal output.
#[derive(Debug, Clone)]
pub struct FlatList<'a> {
    nodes: &'a [TraversalNode],
    page_size: usize,
    page: usize,
}

impl<'a> FlatList<'a> {
    /// Build a list positioned on page 1.
    pub fn new(nodes: &'a [TraversalNode], options: FlatListOptions) -> Self {
        Self {
            nodes,
            page_size: options.page_size.max(1),
            page: 1,
        }
    }

    /// Total number of members.
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the list has no members.
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Members per page.
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current page (1-based).
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Number of pages; zero for an empty list.
    pub const fn total_pages(&self) -> usize {
        self.nodes.len().div_ceil(self.page_size)
    }

    /// Move to page `n` if it exists. Returns whether the page changed.
    pub const fn go_to_page(&mut self, n: usize) -> bool {
        if n >= 1 && n <= self.total_pages() {
            self.page = n;
            true
        } else {
            false
        }
    }

    /// Whether a following page exists.
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Whether a preceding page exists.
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Advance one page. No-op on the last page.
    pub const fn next(&mut self) -> bool {
        if self.has_next() {
            self.page = self.page.saturating_add(1);
            true
        } else {
            false
        }
    }

    /// Go back one page. No-op on the first page.
    pub const fn prev(&mut self) -> bool {
        if self.has_prev() {
            self.page = self.page.saturating_sub(1);
            true
        } else {
            false
        }
    }

    fn start(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    fn end(&self) -> usize {
        self.start().saturating_add(self.page_size).min(self.nodes.len())
    }

    /// Members on the current page.
    pub fn current_items(&self) -> &'a [TraversalNode] {
        self.nodes.get(self.start()..self.end()).unwrap_or_default()
    }

    /// 1-based positions of the first and last member shown, or `None` for
    /// an empty list.
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.is_empty() {
            return None;
        }
        Some((self.start().saturating_add(1), self.end()))
    }

    /// 1-based position in the whole list of the `index`-th member of the
    /// current page.
    pub fn global_index(&self, index: usize) -> usize {
        self.start().saturating_add(index).saturating_add(1)
    }

    /// Page links around the current page.
    ///
    /// Shows up to two pages either side of the current one. The first and
    /// last pages are always reachable, with an ellipsis when the gap to the
    /// window is more than one page.
    pub fn page_window(&self) -> Vec<PageLink> {
        let total = self.total_pages();
        if total == 0 {
            return Vec::new();
        }

        let low = self.page.saturating_sub(WINDOW_RADIUS).max(1);
        let high = self.page.saturating_add(WINDOW_RADIUS).min(total);
        let mut links = Vec::new();

        if low > 1 {
            links.push(PageLink::Page(1));
            if low > 2 {
                links.push(PageLink::Ellipsis);
            }
        }
        links.extend((low..=high).map(PageLink::Page));
        if high < total {
            if high < total.saturating_sub(1) {
                links.push(PageLink::Ellipsis);
            }
            links.push(PageLink::Page(total));
        }
        links
    }
}

#[cfg(test)]
mod tests {
    use downline_types::{AccountSnapshot, Address};

    use super::*;

    fn nodes(count: u64) -> Vec<TraversalNode> {
        (1..=count)
            .map(|n| TraversalNode {
                snapshot: AccountSnapshot::unregistered(Address::from_low_u64_be(n)),
                depth: 1,
                parent: Address::ZERO,
            })
            .collect()
    }

    #[test]
    fn twenty_five_members_make_three_pages() {
        let nodes = nodes(25);
        let mut list = FlatList::new(&nodes, FlatListOptions::default());
        assert_eq!(list.total_pages(), 3);
        assert_eq!(list.current_items().len(), 10);

        assert!(list.go_to_page(3));
        assert_eq!(list.current_items().len(), 5);
        assert_eq!(
            list.current_items().first().map(TraversalNode::address),
            Some(Address::from_low_u64_be(21))
        );
        assert_eq!(list.range(), Some((21, 25)));
    }

    #[test]
    fn out_of_range_pages_are_ignored() {
        let nodes = nodes(25);
        let mut list = FlatList::new(&nodes, FlatListOptions::default());
        list.go_to_page(2);

        assert!(!list.go_to_page(0));
        assert_eq!(list.page(), 2);
        assert!(!list.go_to_page(4));
        assert_eq!(list.page(), 2);
    }

    #[test]
    fn next_and_prev_stop_at_bounds() {
        let nodes = nodes(15);
        let mut list = FlatList::new(&nodes, FlatListOptions::default());

        assert!(!list.has_prev());
        assert!(!list.prev());
        assert!(list.next());
        assert_eq!(list.page(), 2);
        assert!(!list.has_next());
        assert!(!list.next());
        assert_eq!(list.page(), 2);
        assert_eq!(list.global_index(0), 11);
    }

    #[test]
    fn empty_list_has_no_pages() {
        let mut list = FlatList::new(&[], FlatListOptions::default());
        assert_eq!(list.total_pages(), 0);
        assert_eq!(list.page(), 1);
        assert!(list.current_items().is_empty());
        assert!(!list.go_to_page(1));
        assert_eq!(list.range(), None);
        assert!(list.page_window().is_empty());
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let nodes = nodes(3);
        let list = FlatList::new(&nodes, FlatListOptions { page_size: 0 });
        assert_eq!(list.page_size(), 1);
        assert_eq!(list.total_pages(), 3);
    }

    #[test]
    fn page_window_near_start_and_middle() {
        let nodes = nodes(100);
        let mut list = FlatList::new(&nodes, FlatListOptions::default());
        assert_eq!(
            list.page_window(),
            vec![
                PageLink::Page(1),
                PageLink::Page(2),
                PageLink::Page(3),
                PageLink::Ellipsis,
                PageLink::Page(10),
            ]
        );

        list.go_to_page(6);
        assert_eq!(
            list.page_window(),
            vec![
                PageLink::Page(1),
                PageLink::Ellipsis,
                PageLink::Page(4),
                PageLink::Page(5),
                PageLink::Page(6),
                PageLink::Page(7),
                PageLink::Page(8),
                PageLink::Ellipsis,
                PageLink::Page(10),
            ]
        );
    }

    #[test]
    fn page_window_without_gaps() {
        let nodes = nodes(40);
        let mut list = FlatList::new(&nodes, FlatListOptions::default());
        list.go_to_page(4);
        assert_eq!(
            list.page_window(),
            vec![
                PageLink::Page(1),
                PageLink::Page(2),
                PageLink::Page(3),
                PageLink::Page(4),
            ]
        );
    }
}
