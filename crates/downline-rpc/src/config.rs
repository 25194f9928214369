//! Connection settings for [`RpcSource`](crate::RpcSource).

use std::time::Duration;

use downline_types::Address;

/// Public BSC mainnet endpoint.
pub const DEFAULT_RPC_URL: &str = "https://bsc-dataseed.binance.org/";

/// The production referral contract.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xdEC200Bb7c040DDFe9CE3Db50Aaa784F4238E396";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to reach the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL.
    pub url: String,
    /// Address of the referral contract.
    pub contract: Address,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl RpcConfig {
    /// Settings for `contract` at `url` with the default timeout.
    pub fn new(url: impl Into<String>, contract: Address) -> Self {
        Self {
            url: url.into(),
            contract,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
