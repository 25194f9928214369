//! Shared type definitions for the downline explorer.
//!
//! Every crate in the workspace speaks in these types: the ledger source
//! produces [`RawAccountInfo`] tuples, the engine normalizes them into
//! [`AccountSnapshot`] values and emits [`TraversalNode`] lists, and the
//! views render them.
//!
//! # Modules
//!
//! - [`address`] -- 20-byte account identities and the zero sentinel
//! - [`grade`] -- Rank tiers
//! - [`earnings`] -- Fixed-point token amounts
//! - [`raw`] -- Raw ledger tuples
//! - [`snapshot`] -- Normalized account state and traversal nodes

pub mod address;
pub mod earnings;
pub mod grade;
pub mod raw;
pub mod snapshot;

pub use address::{Address, AddressParseError, ADDRESS_LEN};
pub use earnings::{Earnings, UNITS_PER_TOKEN};
pub use grade::Grade;
pub use raw::{ACCOUNT_TUPLE_LEN, RawAccountInfo, RawValue};
pub use snapshot::{AccountSnapshot, TraversalNode};
