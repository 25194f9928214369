//! `downline` binary: prints the downline of one account.
//!
//! Loads configuration, walks the referral tree below the given root
//! through the configured JSON-RPC endpoint, and prints the selected view
//! to stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! downline 0x1234...            # root from the first argument
//! DOWNLINE_ROOT=0x1234 downline # or from the environment
//! ```
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `downline-config.yaml` (or `DOWNLINE_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Resolve the root address
//! 4. Build the RPC source and controller
//! 5. Load the downline and render it

mod config;
mod error;
mod render;

use std::path::PathBuf;

use downline_engine::DownlineController;
use downline_rpc::RpcSource;
use downline_types::Address;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{DownlineConfig, LoggingConfig};
use crate::error::CliError;

/// Config file used when `DOWNLINE_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "downline-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the root address, or the root
/// account lookup fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        network = config.network.name,
        chain_id = config.network.chain_id,
        rpc_url = config.network.rpc_url,
        contract = config.contract.address,
        "Configuration loaded"
    );

    // 3. Resolve the root.
    let root = resolve_root(std::env::args().nth(1))?;

    // 4. Build the source and controller.
    let rpc_config = config.rpc_config().map_err(CliError::from)?;
    let source = RpcSource::new(&rpc_config).map_err(CliError::from)?;
    let mut controller = DownlineController::new(source, root, config.downline.max_depth);

    // 5. Load and render.
    let state = controller.ensure_loaded().await;
    if let Some(error) = controller.last_error() {
        return Err(CliError::from(error.clone()).into());
    }

    if let Some(downline) = controller.downline() {
        let output = render::render(downline, &config)?;
        println!("{output}");
    } else {
        warn!(?state, "no downline available");
    }

    Ok(())
}

/// Load configuration from the file named by `DOWNLINE_CONFIG`, or
/// `downline-config.yaml`.
///
/// Falls back to defaults (with environment overrides) when the file does
/// not exist.
fn load_config() -> Result<DownlineConfig, CliError> {
    let path = std::env::var("DOWNLINE_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        Ok(DownlineConfig::from_file(&path)?)
    } else {
        let mut config = DownlineConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

/// Install the fmt subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Root from the first argument, else `DOWNLINE_ROOT`.
fn resolve_root(argument: Option<String>) -> Result<Address, CliError> {
    let value = argument
        .or_else(|| std::env::var("DOWNLINE_ROOT").ok())
        .ok_or(CliError::MissingRoot)?;

    value
        .parse()
        .map_err(move |source| CliError::InvalidRoot { value, source })
}
