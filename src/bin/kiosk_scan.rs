//! kiosk-scan: inspect kiosk ownership of Sui wallets
//!
//! ## Commands
//!
//! - **discover**: kiosks and collectibles of one wallet, in one report
//! - **watch**: the same, printed incrementally as results arrive
//! - **plan**: which of many wallets already own a kiosk to reuse
//!
//! ## Example Usage
//!
//! ```bash
//! # Everything a wallet holds, as JSON
//! kiosk-scan discover 0x7d20dcdb... --json
//!
//! # Against testnet, with verbose logs
//! kiosk-scan --network testnet --verbose watch 0x7d20dcdb...
//!
//! # Reuse plan for a list of wallets
//! kiosk-scan plan --file wallets.txt
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sui_kiosk::telemetry::init_tracing;
use sui_kiosk::transport::network::{infer_network_from_url, resolve_rpc_endpoint, Network};
use sui_kiosk::types::RetryConfig;
use sui_kiosk::{Discovery, DiscoveryConfig, JsonRpcClient};
use tracing::debug;

mod scan_cli;

use scan_cli::{discover::DiscoverCmd, plan::PlanCmd, watch::WatchCmd, ScanContext};

#[derive(Parser)]
#[command(
    name = "kiosk-scan",
    author,
    version,
    about = "Kiosk ownership discovery for Sui wallets",
    long_about = "Finds the kiosks a wallet controls, the collectibles placed in them,\n\
                  and the collectibles it holds directly."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Fullnode JSON-RPC URL (overrides --network, which overrides SUI_RPC_URL)
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Network preset: mainnet, testnet, devnet or localnet
    #[arg(long, global = true)]
    network: Option<Network>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Attempts per remote call, including the first
    #[arg(long, global = true)]
    retries: Option<usize>,

    /// Linear backoff base in milliseconds
    #[arg(long, global = true)]
    retry_base_ms: Option<u64>,

    /// Pause between successive calls of one loop, in milliseconds
    #[arg(long, global = true)]
    call_delay_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover kiosks and collectibles of a wallet
    Discover(DiscoverCmd),

    /// Discover progressively, printing updates as they arrive
    Watch(WatchCmd),

    /// Plan kiosk reuse for many wallets
    Plan(PlanCmd),
}

impl Cli {
    /// Environment defaults overridden by the command-line flags.
    fn retry_config(&self) -> RetryConfig {
        let mut retry = RetryConfig::from_env();
        if let Some(attempts) = self.retries {
            retry.attempts = attempts.max(1);
        }
        if let Some(ms) = self.retry_base_ms {
            retry.base_delay = std::time::Duration::from_millis(ms);
        }
        if let Some(ms) = self.call_delay_ms {
            retry.call_delay = std::time::Duration::from_millis(ms);
        }
        retry
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let endpoint = resolve_rpc_endpoint(cli.rpc_url.as_deref(), cli.network);
    let config = DiscoveryConfig::from_env().with_retry(cli.retry_config());
    let network = cli.network.or_else(|| infer_network_from_url(&endpoint));
    debug!(
        endpoint = %endpoint,
        network = network.map_or("custom", Network::as_str),
        retry = ?config.retry,
        "starting kiosk-scan"
    );

    let discovery = Discovery::new(Arc::new(JsonRpcClient::new(&endpoint)), config);
    let ctx = ScanContext::new(discovery, cli.json);

    match cli.command {
        Commands::Discover(cmd) => cmd.execute(&ctx).await,
        Commands::Watch(cmd) => cmd.execute(&ctx).await,
        Commands::Plan(cmd) => cmd.execute(&ctx).await,
    }
}
