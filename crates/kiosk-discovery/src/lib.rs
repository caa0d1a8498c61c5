//! Kiosk ownership discovery for Sui wallets.
//!
//! This crate provides:
//! - [`capability`]: owned kiosk capabilities, with an unfiltered-scan fallback
//! - [`content`]: items placed inside a kiosk, via its dynamic-field index
//! - [`direct`]: collectibles held directly by the wallet
//! - [`orchestrator`]: [`Discovery`], batch and progressive whole-wallet runs
//! - [`planner`]: [`ReconciliationPlanner`], kiosk reuse planning for many wallets
//! - [`extract`], [`item_ref`], [`classify`]: the pure schema-drift heuristics
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sui_kiosk_discovery::{Discovery, DiscoveryConfig};
//! use sui_kiosk_transport::network::Network;
//! use sui_kiosk_transport::JsonRpcClient;
//!
//! let client = JsonRpcClient::new(Network::Mainnet.default_rpc_url());
//! let discovery = Discovery::new(Arc::new(client), DiscoveryConfig::from_env());
//! let result = discovery.discover("0x...").await?;
//! for item in result.direct_items() {
//!     println!("{}", item.item_id);
//! }
//! ```

pub mod capability;
pub mod classify;
pub mod config;
pub mod content;
pub mod direct;
pub mod extract;
pub mod item_ref;
pub mod orchestrator;
pub mod planner;

pub use capability::{CapabilityResolver, CapabilityScan};
pub use classify::{is_capability_type, Classifier};
pub use config::{DiscoveryConfig, PlannerConfig, DEFAULT_CONTENT_MARKERS, KIOSK_OWNER_CAP_TYPE};
pub use content::ContentResolver;
pub use direct::DirectOwnershipResolver;
pub use extract::{default_container_extractors, FieldExtractor};
pub use item_ref::ItemRef;
pub use orchestrator::{merge_items, Discovery};
pub use planner::{PlanSummary, ReconciliationPlanner};
