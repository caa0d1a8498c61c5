//! Sui Kiosk Transport Layer
//!
//! Network access for kiosk discovery.
//!
//! This crate provides:
//! - [`client`]: the [`ObjectClient`] trait, the four read operations discovery needs
//! - [`jsonrpc`]: [`JsonRpcClient`], the fullnode JSON-RPC implementation
//! - [`records`]: raw object and dynamic-field records parsed from responses
//! - [`retry`]: bounded-attempt retry with linear backoff, and call pacing
//! - [`paginate`]: cursor-following [`Paginator`] with a hard page ceiling
//! - [`network`]: endpoint presets and network inference
//! - [`fixture`]: an in-memory [`ObjectClient`] for tests and offline runs
//!
//! # Example
//!
//! ```ignore
//! use sui_kiosk_transport::network::Network;
//! use sui_kiosk_transport::{JsonRpcClient, ObjectClient, ObjectDataOptions};
//!
//! let client = JsonRpcClient::new(Network::Mainnet.default_rpc_url());
//! let kiosk = client
//!     .get_object(&kiosk_id, ObjectDataOptions::new().with_content())
//!     .await?;
//! ```

pub mod client;
pub mod fixture;
pub mod jsonrpc;
pub mod network;
pub mod paginate;
pub mod records;
pub mod retry;

// Re-export main types for convenience
pub use client::{ObjectClient, ObjectDataOptions, ObjectFilter, OwnedObjectsQuery, Page};
pub use fixture::FixtureClient;
pub use jsonrpc::JsonRpcClient;
pub use paginate::{Paginator, DEFAULT_MAX_PAGES};
pub use records::{DynamicFieldEntry, FieldKind, RawObjectRecord};
pub use retry::{with_retry, Pacer};

/// Largest id list accepted by `sui_multiGetObjects`.
pub const MAX_MULTI_GET: usize = 50;
