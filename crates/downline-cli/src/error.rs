//! Error types for the `downline` binary.
//!
//! [`CliError`] wraps every failure mode between startup and output so
//! `main` can propagate with `?`.

use downline_engine::DownlineError;
use downline_rpc::RpcError;
use downline_types::AddressParseError;

use crate::config::ConfigError;

/// Top-level error for the `downline` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The RPC source could not be built.
    #[error("rpc error: {source}")]
    Rpc {
        /// The underlying construction error.
        #[from]
        source: RpcError,
    },

    /// No root identity was given.
    #[error("no root address given: pass one as the first argument or set DOWNLINE_ROOT")]
    MissingRoot,

    /// The root identity did not parse.
    #[error("invalid root address {value:?}: {source}")]
    InvalidRoot {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        source: AddressParseError,
    },

    /// The traversal failed at the root.
    #[error("traversal failed: {source}")]
    Traversal {
        /// The root-level traversal error.
        #[from]
        source: DownlineError,
    },

    /// JSON output could not be produced.
    #[error("failed to encode output: {source}")]
    Output {
        /// The underlying serializer error.
        #[from]
        source: serde_json::Error,
    },
}
