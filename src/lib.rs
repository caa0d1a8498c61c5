//! Sui Kiosk Ownership Discovery
//!
//! Finds what a Sui wallet holds in kiosks and directly:
//!
//! - **Capabilities**: the wallet's `KioskOwnerCap`s and the kiosks they control
//! - **Kiosk content**: collectibles placed in each kiosk
//! - **Direct ownership**: collectibles held outside any kiosk
//! - **Bulk planning**: which wallets already have a kiosk to reuse
//!
//! The work is split across the workspace crates re-exported here:
//! [`types`] (data model and errors), [`transport`] (the remote object
//! client, retry and pagination) and [`discovery`] (resolvers, orchestrator
//! and planner). The `kiosk-scan` binary is a thin front end over them.

pub mod inputs;
pub mod telemetry;

pub use sui_kiosk_discovery as discovery;
pub use sui_kiosk_transport as transport;
pub use sui_kiosk_types as types;

pub use sui_kiosk_discovery::{Discovery, DiscoveryConfig, PlannerConfig, ReconciliationPlanner};
pub use sui_kiosk_transport::{JsonRpcClient, ObjectClient};
pub use sui_kiosk_types::{DiscoveryError, DiscoveryResult, DiscoveryUpdate, ReconciliationTarget};
