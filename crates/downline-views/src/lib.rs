//! Consumer-facing projections of a downline traversal.
//!
//! All three views borrow the same ordered node list produced by one
//! traversal and never go back to the ledger, so they always agree with
//! each other.
//!
//! - [`flat`] -- [`FlatList`], fixed-size pages in traversal order
//! - [`levels`] -- [`LevelGrouping`], members grouped by depth
//! - [`tree`] -- [`DownlineTree`], nested sponsor-to-referral tree with an
//!   expanded set
//! - [`format`] -- Display helpers shared by the views

pub mod flat;
pub mod format;
pub mod levels;
pub mod tree;

pub use flat::{FlatList, FlatListOptions, PageLink, DEFAULT_PAGE_SIZE};
pub use levels::LevelGrouping;
pub use tree::{DownlineTree, NodeId, TreeOptions, TreeRow};
