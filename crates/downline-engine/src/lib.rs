//! Downline traversal and aggregation engine.
//!
//! Given a root identity in a referral network, this crate discovers every
//! descendant through an [`AccountSource`], bounds the walk by depth, and
//! isolates per-account failures so one unreadable branch does not sink the
//! whole query. The result is a single ordered node list that every view
//! is built from.
//!
//! # Architecture
//!
//! ```text
//! DownlineController --> traverse --> fetch_snapshot --> normalize
//!                                 \-> fetch_children
//! ```
//!
//! # Modules
//!
//! - [`source`] -- [`AccountSource`] trait and [`InMemorySource`]
//! - [`normalize`] -- Raw tuple to [`AccountSnapshot`](downline_types::AccountSnapshot)
//! - [`fetch`] -- Per-account lookups with error mapping
//! - [`traversal`] -- Depth-bounded pre-order walk
//! - [`controller`] -- Load-once state machine with generation-checked reloads
//! - [`error`] -- [`SourceError`] and [`DownlineError`]
//!
//! # Usage
//!
//! ```
//! use downline_engine::{DownlineController, InMemorySource, LoadState};
//! use downline_types::Address;
//!
//! let founder = Address::from_low_u64_be(1);
//! let mut source = InMemorySource::with_founder(founder);
//! source.add_referral(founder, Address::from_low_u64_be(2));
//!
//! let mut controller = DownlineController::new(source, founder, 15);
//! let runtime = tokio::runtime::Builder::new_current_thread().build().ok();
//! if let Some(runtime) = runtime {
//!     let state = runtime.block_on(controller.ensure_loaded());
//!     assert_eq!(state, LoadState::Loaded);
//!     assert_eq!(controller.nodes().len(), 1);
//! }
//! ```

pub mod controller;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod source;
pub mod traversal;

pub use controller::{DownlineController, LoadState, LoadTicket};
pub use error::{DownlineError, SourceError};
pub use fetch::{fetch_children, fetch_snapshot};
pub use normalize::normalize;
pub use source::{AccountSource, InMemorySource};
pub use traversal::{traverse, Downline, TraversalReport, DEFAULT_MAX_DEPTH};
