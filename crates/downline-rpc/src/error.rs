//! Errors raised while setting up an RPC source.
//!
//! Failures of individual calls are reported as
//! [`SourceError`](downline_engine::SourceError) so the engine can apply
//! its per-node policy.

/// Errors constructing an [`RpcSource`](crate::RpcSource).
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The endpoint URL could not be parsed.
    #[error("invalid RPC url {url}: {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}
