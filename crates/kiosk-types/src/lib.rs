//! Shared types for the sui-kiosk workspace.
//!
//! This crate provides the data model used by the transport and discovery
//! crates, breaking circular dependency chains:
//!
//! - [`address`]: validated [`Address`] and [`ObjectId`] identifiers
//! - [`model`]: capabilities, content items, discovery results and reconciliation targets
//! - [`error`]: the error taxonomy surfaced at the public entry points
//! - [`env_utils`]: environment variable helpers used for configuration

pub mod address;
pub mod env_utils;
pub mod error;
pub mod model;

pub use address::{normalize_hex, Address, ObjectId, ADDRESS_HEX_LEN};
pub use env_utils::{env_var, env_var_or};
pub use error::{DiscoveryError, ErrorCode, RateLimitError, ValidationError};
pub use model::{
    ContainerCapability, ContainerRef, ContentItem, DiscoveryResult, DiscoveryUpdate,
    DisplayMetadata, ReconciliationTarget, TargetStatus, DIRECT_OWNERSHIP,
};

use std::time::Duration;

/// Configuration for retry behavior on network operations.
///
/// Backoff is linear: the wait before attempt `n + 1` is `base_delay * n`.
/// `call_delay` is the fixed pause inserted between successive remote calls
/// issued from the same sequential loop (pagination, batch fetches).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one.
    pub attempts: usize,
    /// Base backoff duration, multiplied by the attempt number.
    pub base_delay: Duration,
    /// Minimum spacing between calls within one loop.
    pub call_delay: Duration,
}

impl RetryConfig {
    /// Create a new RetryConfig with the specified parameters.
    pub fn new(attempts: usize, base_delay_ms: u64, call_delay_ms: u64) -> Self {
        Self {
            attempts,
            base_delay: Duration::from_millis(base_delay_ms),
            call_delay: Duration::from_millis(call_delay_ms),
        }
    }

    /// No waiting at all. Used by tests and local fixtures.
    pub fn immediate(attempts: usize) -> Self {
        Self::new(attempts, 0, 0)
    }

    /// Defaults overridden by `KIOSK_RETRY_ATTEMPTS`, `KIOSK_RETRY_BASE_MS`
    /// and `KIOSK_CALL_DELAY_MS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            attempts: env_var_or("KIOSK_RETRY_ATTEMPTS", defaults.attempts),
            base_delay: Duration::from_millis(env_var_or(
                "KIOSK_RETRY_BASE_MS",
                defaults.base_delay.as_millis() as u64,
            )),
            call_delay: Duration::from_millis(env_var_or(
                "KIOSK_CALL_DELAY_MS",
                defaults.call_delay.as_millis() as u64,
            )),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(1000),
            call_delay: Duration::from_millis(100),
        }
    }
}
