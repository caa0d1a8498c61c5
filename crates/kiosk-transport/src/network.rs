//! Fullnode endpoint presets.
//!
//! The endpoint is bound into each client at construction. Switching networks
//! means building a new client (and a new discovery pipeline around it), so
//! calls already in flight keep talking to the endpoint they started on.

use std::fmt;
use std::str::FromStr;

use sui_kiosk_types::env_var;

const MAINNET_RPC: &str = "https://fullnode.mainnet.sui.io:443";
const TESTNET_RPC: &str = "https://fullnode.testnet.sui.io:443";
const DEVNET_RPC: &str = "https://fullnode.devnet.sui.io:443";
const LOCALNET_RPC: &str = "http://127.0.0.1:9000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        }
    }

    pub fn default_rpc_url(self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_RPC,
            Network::Testnet => TESTNET_RPC,
            Network::Devnet => DEVNET_RPC,
            Network::Localnet => LOCALNET_RPC,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" | "local" => Ok(Network::Localnet),
            other => Err(format!("unknown network: {other}")),
        }
    }
}

pub fn infer_network_from_url(url: &str) -> Option<Network> {
    let lower = url.to_lowercase();
    if lower.contains("testnet") {
        Some(Network::Testnet)
    } else if lower.contains("devnet") {
        Some(Network::Devnet)
    } else if lower.contains("mainnet") {
        Some(Network::Mainnet)
    } else if lower.contains("127.0.0.1") || lower.contains("localhost") {
        Some(Network::Localnet)
    } else {
        None
    }
}

/// Pick the RPC endpoint: an explicit URL wins, then an explicit network
/// preset, then `SUI_RPC_URL`, then mainnet.
pub fn resolve_rpc_endpoint(explicit: Option<&str>, network: Option<Network>) -> String {
    pick_endpoint(explicit, network, env_var("SUI_RPC_URL"))
}

fn pick_endpoint(
    explicit: Option<&str>,
    network: Option<Network>,
    from_env: Option<String>,
) -> String {
    if let Some(url) = explicit.filter(|u| !u.trim().is_empty()) {
        return url.to_string();
    }
    if let Some(network) = network {
        return network.default_rpc_url().to_string();
    }
    from_env
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| Network::Mainnet.default_rpc_url().to_string())
}
