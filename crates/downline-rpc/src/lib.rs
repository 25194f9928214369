//! JSON-RPC ledger source for the downline engine.
//!
//! Implements [`AccountSource`](downline_engine::AccountSource) against an
//! EVM referral contract through `eth_call`:
//!
//! | Lookup | Contract call | Result |
//! |--------|---------------|--------|
//! | `account_info` | `getAccountFullInfo(address)` | 7-word static tuple |
//! | `children` | `getReferrals(address)` | dynamic `address[]` |
//!
//! # Modules
//!
//! - [`abi`] -- Selectors, calldata encoding and result decoding
//! - [`client`] -- [`RpcSource`], the HTTP client
//! - [`config`] -- [`RpcConfig`] and network defaults
//! - [`error`] -- [`RpcError`] for construction failures

pub mod abi;
pub mod client;
pub mod config;
pub mod error;

pub use client::RpcSource;
pub use config::{RpcConfig, DEFAULT_CONTRACT_ADDRESS, DEFAULT_RPC_URL, DEFAULT_TIMEOUT};
pub use error::RpcError;
