//! Tunables for discovery and bulk planning.

use std::time::Duration;

use sui_kiosk_transport::{Paginator, DEFAULT_MAX_PAGES, MAX_MULTI_GET};
use sui_kiosk_types::{env_var_or, RetryConfig};

use crate::extract::{default_container_extractors, FieldExtractor};

/// Server-side filter type for the primary capability query.
pub const KIOSK_OWNER_CAP_TYPE: &str = "0x2::kiosk::KioskOwnerCap";

/// Case-insensitive type-name markers that identify collectibles.
pub const DEFAULT_CONTENT_MARKERS: &[&str] =
    &["nft", "collectible", "artwork", "pfp", "ticket", "badge"];

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub retry: RetryConfig,
    /// Page ceiling for every pagination loop.
    pub max_pages: usize,
    pub owned_page_size: usize,
    pub dynamic_field_page_size: usize,
    /// Ids per `multi_get_objects` call, capped at [`MAX_MULTI_GET`].
    pub multi_get_batch: usize,
    /// Kiosks whose content is resolved at the same time.
    pub container_concurrency: usize,
    pub capability_type: String,
    /// Tried in order; the first field that yields a valid id wins.
    pub container_fields: Vec<FieldExtractor>,
    pub content_markers: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            max_pages: DEFAULT_MAX_PAGES,
            owned_page_size: 50,
            dynamic_field_page_size: 50,
            multi_get_batch: MAX_MULTI_GET,
            container_concurrency: 8,
            capability_type: KIOSK_OWNER_CAP_TYPE.to_string(),
            container_fields: default_container_extractors(),
            content_markers: DEFAULT_CONTENT_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl DiscoveryConfig {
    /// Defaults overridden by `KIOSK_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            retry: RetryConfig::from_env(),
            max_pages: env_var_or("KIOSK_MAX_PAGES", defaults.max_pages),
            container_concurrency: env_var_or("KIOSK_CONCURRENCY", defaults.container_concurrency),
            ..defaults
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub(crate) fn paginator(&self) -> Paginator {
        Paginator::new(self.retry).with_max_pages(self.max_pages)
    }

    pub(crate) fn batch_size(&self) -> usize {
        self.multi_get_batch.clamp(1, MAX_MULTI_GET)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Larger inputs are rejected outright.
    pub max_targets: usize,
    /// Addresses resolved concurrently per batch.
    pub batch_size: usize,
    /// Pause between batches.
    pub batch_delay: Duration,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_targets: 100,
            batch_size: 10,
            batch_delay: Duration::from_millis(500),
        }
    }
}
