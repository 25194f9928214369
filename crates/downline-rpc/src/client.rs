//! [`AccountSource`] over a JSON-RPC `eth_call` endpoint.
//!
//! Each lookup is one `eth_call` against the referral contract at the
//! `latest` block. Transport failures, non-success HTTP statuses and
//! JSON-RPC `error` objects all surface as [`SourceError`] so the engine
//! decides what a failure costs.

use std::sync::atomic::{AtomicU64, Ordering};

use downline_engine::{AccountSource, SourceError};
use downline_types::{Address, RawAccountInfo};
use serde::Deserialize;
use tracing::debug;

use crate::abi::{
    self, decode_account_info, decode_address_array, encode_address_call, ACCOUNT_INFO_SIGNATURE,
    REFERRALS_SIGNATURE, SELECTOR_LEN,
};
use crate::config::RpcConfig;
use crate::error::RpcError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A JSON-RPC 2.0 reply carrying either a hex result or an error.
#[derive(Debug, Deserialize)]
struct JsonRpcReply {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

impl JsonRpcReply {
    fn into_result(self) -> Result<String, SourceError> {
        match (self.error, self.result) {
            (Some(error), _) => Err(SourceError::Rpc {
                code: error.code,
                message: error.message,
            }),
            (None, Some(result)) => Ok(result),
            (None, None) => Err(SourceError::Decode(
                "reply has neither result nor error".to_owned(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Reads the referral ledger through `eth_call`.
#[derive(Debug)]
pub struct RpcSource {
    client: reqwest::Client,
    url: reqwest::Url,
    contract: Address,
    next_id: AtomicU64,
    account_info_selector: [u8; SELECTOR_LEN],
    referrals_selector: [u8; SELECTOR_LEN],
}

impl RpcSource {
    /// Build a source from `config`.
    ///
    /// # Errors
    ///
    /// [`RpcError::InvalidUrl`] if the endpoint does not parse, or
    /// [`RpcError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &RpcConfig) -> Result<Self, RpcError> {
        let url = reqwest::Url::parse(&config.url).map_err(|e| RpcError::InvalidUrl {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RpcError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url,
            contract: config.contract,
            next_id: AtomicU64::new(1),
            account_info_selector: abi::selector(ACCOUNT_INFO_SIGNATURE),
            referrals_selector: abi::selector(REFERRALS_SIGNATURE),
        })
    }

    /// The contract being queried.
    pub const fn contract(&self) -> Address {
        self.contract
    }

    /// The endpoint URL.
    pub const fn url(&self) -> &reqwest::Url {
        &self.url
    }

    /// Run one `eth_call` with `data` and return the hex result.
    async fn eth_call(&self, data: String) -> Result<String, SourceError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [
                {"to": self.contract.to_string(), "data": data},
                "latest"
            ],
            "id": id
        });

        debug!(id, contract = %self.contract, "sending eth_call");

        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::Transport(format!("eth_call request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(SourceError::Transport(format!(
                "RPC endpoint returned {status}: {error_body}"
            )));
        }

        let reply: JsonRpcReply = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(format!("eth_call reply parse failed: {e}")))?;

        reply.into_result()
    }
}

impl AccountSource for RpcSource {
    async fn account_info(&self, identity: Address) -> Result<RawAccountInfo, SourceError> {
        let data = encode_address_call(self.account_info_selector, identity);
        let payload = self.eth_call(data).await?;
        decode_account_info(&payload)
    }

    async fn children(&self, identity: Address) -> Result<Vec<Address>, SourceError> {
        let data = encode_address_call(self.referrals_selector, identity);
        let payload = self.eth_call(data).await?;
        decode_address_array(&payload)
    }
}
