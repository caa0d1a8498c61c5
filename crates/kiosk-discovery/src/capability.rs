//! Kiosk owner-capability discovery.
//!
//! The primary strategy asks the fullnode for owned objects of the
//! capability type. Not every provider supports that filter, so when the
//! filtered query is still failing after its retries, the resolver scans
//! every owned object and recognises capabilities by type name instead.
//! The unfiltered page set is handed back to the caller so that direct
//! ownership can be classified without a second sweep.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use sui_kiosk_transport::{
    with_retry, ObjectClient, ObjectDataOptions, ObjectFilter, OwnedObjectsQuery, Pacer,
    RawObjectRecord,
};
use sui_kiosk_types::{Address, ContainerCapability, ObjectId};
use tracing::{debug, warn};

use crate::classify::is_capability_type;
use crate::config::DiscoveryConfig;
use crate::direct::list_owned;
use crate::extract::{extract_container_id, extract_item_count};

/// Outcome of one capability scan.
#[derive(Debug, Clone, Default)]
pub struct CapabilityScan {
    pub capabilities: Vec<ContainerCapability>,
    /// Every owned object, present only when the unfiltered fallback ran.
    pub owned: Option<Vec<RawObjectRecord>>,
}

impl CapabilityScan {
    pub fn used_fallback(&self) -> bool {
        self.owned.is_some()
    }
}

#[derive(Clone)]
pub struct CapabilityResolver {
    client: Arc<dyn ObjectClient>,
    config: Arc<DiscoveryConfig>,
}

impl CapabilityResolver {
    pub fn new(client: Arc<dyn ObjectClient>, config: Arc<DiscoveryConfig>) -> Self {
        Self { client, config }
    }

    /// All kiosk capabilities owned by `owner`, unique by capability id.
    ///
    /// Fails only when both the filtered query and the unfiltered fallback
    /// are exhausted. The returned order carries no meaning.
    pub async fn resolve(&self, owner: &Address) -> Result<Vec<ContainerCapability>> {
        Ok(self.scan(owner, ObjectDataOptions::new()).await?.capabilities)
    }

    /// Like [`resolve`](Self::resolve), but keeps the owned-object set when
    /// the fallback ran. `fallback` names extra blocks to request during the
    /// unfiltered scan; type and content are always requested.
    pub async fn scan(&self, owner: &Address, fallback: ObjectDataOptions) -> Result<CapabilityScan> {
        match self.filtered(owner).await {
            Ok(candidates) => Ok(CapabilityScan {
                capabilities: self.build(owner, candidates).await,
                owned: None,
            }),
            Err(err) => {
                warn!(
                    owner = %owner,
                    endpoint = self.client.endpoint(),
                    filter = %self.config.capability_type,
                    error = %err,
                    "filtered capability query failed, scanning all owned objects"
                );
                self.scan_unfiltered(owner, fallback).await
            }
        }
    }

    /// Scan every owned object and keep capability-like types.
    pub async fn scan_unfiltered(
        &self,
        owner: &Address,
        fallback: ObjectDataOptions,
    ) -> Result<CapabilityScan> {
        let options = fallback.with_type().with_content();
        let owned = list_owned(self.client.as_ref(), &self.config, owner, options).await?;
        let candidates: Vec<RawObjectRecord> = owned
            .iter()
            .filter(|record| is_capability_type(record.type_tag()))
            .cloned()
            .collect();
        debug!(
            owner = %owner,
            owned = owned.len(),
            candidates = candidates.len(),
            "unfiltered owned-object scan complete"
        );
        Ok(CapabilityScan {
            capabilities: self.build(owner, candidates).await,
            owned: Some(owned),
        })
    }

    async fn filtered(&self, owner: &Address) -> Result<Vec<RawObjectRecord>> {
        let query = OwnedObjectsQuery::new(ObjectDataOptions::new().with_type().with_content())
            .with_filter(ObjectFilter::StructType(self.config.capability_type.clone()));
        let query = &query;
        let limit = self.config.owned_page_size;
        let client = self.client.as_ref();
        self.config
            .paginator()
            .collect_all("owned_capabilities", |cursor| {
                client.get_owned_objects(owner, query, cursor, limit)
            })
            .await
    }

    /// Turn candidate records into capabilities. Records without a usable
    /// kiosk reference are skipped.
    async fn build(&self, owner: &Address, candidates: Vec<RawObjectRecord>) -> Vec<ContainerCapability> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        for record in candidates {
            let Ok(capability_id) = ObjectId::parse(&record.object_id) else {
                debug!(owner = %owner, object = %record.object_id, "capability with malformed id, skipping");
                continue;
            };
            let found = record
                .fields
                .as_ref()
                .and_then(|fields| extract_container_id(fields, &self.config.container_fields));
            match found {
                Some((container_id, via)) => {
                    if seen.insert(capability_id.clone()) {
                        debug!(
                            capability = %capability_id.short(),
                            kiosk = %container_id.short(),
                            field = via,
                            "resolved kiosk reference"
                        );
                        resolved.push((capability_id, container_id));
                    }
                }
                None => debug!(
                    owner = %owner,
                    capability = %capability_id,
                    type_tag = record.type_tag(),
                    "no kiosk reference in capability, skipping"
                ),
            }
        }

        let mut pacer = Pacer::new(self.config.retry.call_delay);
        let mut capabilities = Vec::with_capacity(resolved.len());
        for (capability_id, container_id) in resolved {
            pacer.tick().await;
            let item_count = self.item_count(&container_id).await;
            capabilities.push(ContainerCapability {
                capability_id,
                container_id,
                item_count,
            });
        }
        capabilities
    }

    /// Item count of a kiosk, 0 when it cannot be read.
    async fn item_count(&self, kiosk: &ObjectId) -> u64 {
        let options = ObjectDataOptions::new().with_content();
        let client = self.client.as_ref();
        let fetched = with_retry(&self.config.retry, "kiosk_item_count", || {
            client.get_object(kiosk, options)
        })
        .await;

        match fetched {
            Ok(Some(record)) => record
                .fields
                .as_ref()
                .and_then(extract_item_count)
                .unwrap_or(0),
            Ok(None) => {
                debug!(kiosk = %kiosk, "kiosk object not found, item count 0");
                0
            }
            Err(err) => {
                warn!(kiosk = %kiosk, error = %err, "could not read kiosk item count, using 0");
                0
            }
        }
    }
}
