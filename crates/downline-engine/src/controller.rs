//! Load-state controller around the traversal engine.
//!
//! [`DownlineController`] owns the data source, the root identity and the
//! most recent traversal result. It runs the traversal at most once per
//! (source, root) pair until told otherwise, so re-rendering a view never
//! re-walks the ledger.
//!
//! # States
//!
//! ```text
//! Idle --ensure_loaded--> Loading --ok--> Loaded
//!                                 \--err-> Errored
//! Loaded | Errored --reload--> Loading
//! any --invalidate | set_root(new)--> Idle
//! ```
//!
//! # Overlapping loads
//!
//! A load is split into [`begin`] and [`finish`]. Each [`LoadTicket`]
//! carries the generation current when it was issued; invalidating bumps
//! the generation. `finish` applies a result only if its ticket is still
//! current, so a traversal started before a reload can never overwrite the
//! result of the one started after it.
//!
//! [`begin`]: DownlineController::begin
//! [`finish`]: DownlineController::finish

use downline_types::{Address, TraversalNode};
use tracing::{debug, info, warn};

use crate::error::DownlineError;
use crate::source::AccountSource;
use crate::traversal::{traverse, Downline};

/// Where the controller is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing loaded and nothing in flight.
    #[default]
    Idle,
    /// A traversal has been started and not yet finished.
    Loading,
    /// The last traversal succeeded.
    Loaded,
    /// The last traversal failed at the root.
    Errored,
}

/// Proof that a load was started, tagged with its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    /// The generation this load belongs to.
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// Owns one downline query and its cached result.
#[derive(Debug)]
pub struct DownlineController<S> {
    source: S,
    root: Address,
    max_depth: u32,
    state: LoadState,
    downline: Option<Downline>,
    last_error: Option<DownlineError>,
    generation: u64,
}

impl<S: AccountSource> DownlineController<S> {
    /// Create an idle controller. Nothing is fetched until
    /// [`ensure_loaded`](Self::ensure_loaded) or [`reload`](Self::reload).
    pub const fn new(source: S, root: Address, max_depth: u32) -> Self {
        Self {
            source,
            root,
            max_depth,
            state: LoadState::Idle,
            downline: None,
            last_error: None,
            generation: 0,
        }
    }

    /// Current load state.
    pub const fn state(&self) -> LoadState {
        self.state
    }

    /// Whether a traversal is in flight.
    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// The root identity being queried.
    pub const fn root(&self) -> Address {
        self.root
    }

    /// The configured depth bound.
    pub const fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// The underlying data source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The current result, if loaded.
    pub const fn downline(&self) -> Option<&Downline> {
        self.downline.as_ref()
    }

    /// Descendants of the current result; empty unless loaded.
    pub fn nodes(&self) -> &[TraversalNode] {
        self.downline
            .as_ref()
            .map(|d| d.nodes.as_slice())
            .unwrap_or_default()
    }

    /// The root-level error of the last traversal, if it failed.
    pub const fn last_error(&self) -> Option<&DownlineError> {
        self.last_error.as_ref()
    }

    /// Current generation. Bumped by every invalidation.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Mark a load as started and return its ticket.
    pub fn begin(&mut self) -> LoadTicket {
        self.state = LoadState::Loading;
        self.last_error = None;
        debug!(root = %self.root, generation = self.generation, "load started");
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Apply the outcome of the load identified by `ticket`.
    ///
    /// Returns `false` and leaves the controller untouched if the ticket
    /// belongs to an older generation.
    pub fn finish(&mut self, ticket: LoadTicket, result: Result<Downline, DownlineError>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                "discarding stale traversal result"
            );
            return false;
        }

        match result {
            Ok(downline) => {
                info!(root = %self.root, members = downline.len(), "downline loaded");
                self.downline = Some(downline);
                self.last_error = None;
                self.state = LoadState::Loaded;
            }
            Err(error) => {
                warn!(root = %self.root, %error, "downline load failed");
                self.downline = None;
                self.last_error = Some(error);
                self.state = LoadState::Errored;
            }
        }
        true
    }

    /// Run the traversal unless a result exists, a load is in flight, or
    /// the last load failed. Returns the resulting state.
    pub async fn ensure_loaded(&mut self) -> LoadState {
        if self.state != LoadState::Idle {
            debug!(state = ?self.state, "downline already loaded, skipping traversal");
            return self.state;
        }
        self.load().await
    }

    /// Drop the cached result and traverse again.
    pub async fn reload(&mut self) -> LoadState {
        info!(root = %self.root, "reloading downline");
        self.invalidate();
        self.load().await
    }

    /// Drop the cached result and error and return to [`LoadState::Idle`].
    ///
    /// Any load already in flight becomes stale.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.downline = None;
        self.last_error = None;
        self.state = LoadState::Idle;
    }

    /// Point the controller at a different root. Changing the root
    /// invalidates the cached result.
    pub fn set_root(&mut self, root: Address) {
        if root != self.root {
            self.root = root;
            self.invalidate();
        }
    }

    async fn load(&mut self) -> LoadState {
        let ticket = self.begin();
        let result = traverse(&self.source, self.root, self.max_depth).await;
        self.finish(ticket, result);
        self.state
    }
}
