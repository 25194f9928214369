//! Configuration loading for the `downline` binary.
//!
//! The configuration lives in `downline-config.yaml` in the working
//! directory (or wherever `DOWNLINE_CONFIG` points). Every field has a
//! default, so a missing file or a partial one is fine.

use std::path::Path;
use std::time::Duration;

use downline_engine::DEFAULT_MAX_DEPTH;
use downline_rpc::{RpcConfig, DEFAULT_CONTRACT_ADDRESS, DEFAULT_RPC_URL};
use downline_types::{Address, AddressParseError};
use downline_views::DEFAULT_PAGE_SIZE;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configured contract address is not a valid address.
    #[error("invalid contract address {value:?}: {source}")]
    ContractAddress {
        /// The configured value.
        value: String,
        /// Why it was rejected.
        source: AddressParseError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `downline-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DownlineConfig {
    /// Chain and endpoint settings.
    #[serde(default)]
    pub network: NetworkConfig,

    /// The referral contract.
    #[serde(default)]
    pub contract: ContractConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub rpc: RpcSettings,

    /// Traversal and view settings.
    #[serde(default)]
    pub downline: DownlineSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DownlineConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides:
    ///
    /// - `RPC_URL` overrides `network.rpc_url`
    /// - `CONTRACT_ADDRESS` overrides `contract.address`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string and apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override endpoint settings with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("RPC_URL") {
            self.network.rpc_url = val;
        }
        if let Ok(val) = std::env::var("CONTRACT_ADDRESS") {
            self.contract.address = val;
        }
    }

    /// The parsed contract address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ContractAddress`] if `contract.address` does
    /// not parse.
    pub fn contract_address(&self) -> Result<Address, ConfigError> {
        self.contract
            .address
            .parse()
            .map_err(|source| ConfigError::ContractAddress {
                value: self.contract.address.clone(),
                source,
            })
    }

    /// Client settings for the configured endpoint and contract.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ContractAddress`] if the contract address is
    /// invalid.
    pub fn rpc_config(&self) -> Result<RpcConfig, ConfigError> {
        Ok(
            RpcConfig::new(self.network.rpc_url.clone(), self.contract_address()?)
                .with_timeout(Duration::from_millis(self.rpc.timeout_ms)),
        )
    }

    /// Block explorer page for `address`.
    pub fn explorer_link(&self, address: Address) -> String {
        format!(
            "{}/address/{address}",
            self.network.block_explorer.trim_end_matches('/')
        )
    }
}

/// Chain and endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkConfig {
    /// Human-readable network name.
    #[serde(default = "default_network_name")]
    pub name: String,

    /// EVM chain id.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// JSON-RPC endpoint.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Block explorer base URL.
    #[serde(default = "default_block_explorer")]
    pub block_explorer: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: default_network_name(),
            chain_id: default_chain_id(),
            rpc_url: default_rpc_url(),
            block_explorer: default_block_explorer(),
        }
    }
}

/// The referral contract.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractConfig {
    /// Contract address, `0x`-prefixed hex.
    #[serde(default = "default_contract_address")]
    pub address: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: default_contract_address(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RpcSettings {
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Which projection to print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// Paginated list in traversal order.
    #[default]
    Flat,
    /// Members grouped by depth.
    Levels,
    /// Indented sponsor tree.
    Tree,
}

/// Output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// The full traversal result as JSON.
    Json,
}

/// Traversal and view settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownlineSettings {
    /// Maximum depth below the root.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Members per page in the flat view.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Page shown in the flat view.
    #[serde(default = "default_page")]
    pub page: usize,

    /// Level shown in the levels view; the shallowest when unset.
    #[serde(default)]
    pub level: Option<u32>,

    /// Expand every node in the tree view.
    #[serde(default)]
    pub expand_all: bool,

    /// Which projection to print.
    #[serde(default)]
    pub view: ViewKind,

    /// Output encoding.
    #[serde(default)]
    pub output: OutputFormat,
}

impl Default for DownlineSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            page_size: default_page_size(),
            page: default_page(),
            level: None,
            expand_all: false,
            view: ViewKind::default(),
            output: OutputFormat::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_network_name() -> String {
    "BSC Mainnet".to_owned()
}

const fn default_chain_id() -> u64 {
    56
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_owned()
}

fn default_block_explorer() -> String {
    "https://bscscan.com".to_owned()
}

fn default_contract_address() -> String {
    DEFAULT_CONTRACT_ADDRESS.to_owned()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

const fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

const fn default_page() -> usize {
    1
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DownlineConfig::default();
        assert_eq!(config.network.chain_id, 56);
        assert_eq!(config.rpc.timeout_ms, 10_000);
        assert_eq!(config.downline.max_depth, 15);
        assert_eq!(config.downline.page_size, 10);
        assert_eq!(config.downline.view, ViewKind::Flat);
        assert_eq!(config.logging.level, "info");
        assert!(config.contract_address().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
network:
  name: "BSC Testnet"
  chain_id: 97
  block_explorer: "https://testnet.bscscan.com/"

rpc:
  timeout_ms: 2500

downline:
  max_depth: 4
  page_size: 25
  page: 2
  level: 3
  expand_all: true
  view: tree
  output: json

logging:
  level: debug
"#;
        let config = DownlineConfig::parse(yaml).unwrap();
        assert_eq!(config.network.name, "BSC Testnet");
        assert_eq!(config.network.chain_id, 97);
        assert_eq!(config.rpc.timeout_ms, 2500);
        assert_eq!(config.downline.max_depth, 4);
        assert_eq!(config.downline.page_size, 25);
        assert_eq!(config.downline.page, 2);
        assert_eq!(config.downline.level, Some(3));
        assert!(config.downline.expand_all);
        assert_eq!(config.downline.view, ViewKind::Tree);
        assert_eq!(config.downline.output, OutputFormat::Json);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let config = DownlineConfig::parse("downline:\n  view: levels\n").unwrap();
        assert_eq!(config.downline.view, ViewKind::Levels);
        assert_eq!(config.downline.max_depth, 15);
        assert_eq!(config.network.chain_id, 56);
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        assert!(matches!(
            DownlineConfig::parse("downline: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
        assert!(DownlineConfig::parse("downline:\n  view: sideways\n").is_err());
    }

    #[test]
    fn bad_contract_address_is_reported() {
        let mut config = DownlineConfig::default();
        config.contract.address = "0x1234".to_owned();
        assert!(matches!(
            config.rpc_config(),
            Err(ConfigError::ContractAddress { .. })
        ));
    }

    #[test]
    fn rpc_config_carries_timeout() {
        let mut config = DownlineConfig::default();
        config.rpc.timeout_ms = 1500;
        let rpc = config.rpc_config().unwrap();
        assert_eq!(rpc.timeout, Duration::from_millis(1500));
        assert_eq!(rpc.contract, config.contract_address().unwrap());
    }

    #[test]
    fn explorer_link_trims_slash() {
        let mut config = DownlineConfig::default();
        config.network.block_explorer = "https://testnet.bscscan.com/".to_owned();
        let address = Address::from_low_u64_be(1);
        assert_eq!(
            config.explorer_link(address),
            format!("https://testnet.bscscan.com/address/{address}")
        );
    }
}
