//! Items placed inside a kiosk.
//!
//! The kiosk's dynamic-field index is paginated, each entry is reduced to a
//! candidate item id ([`ItemRef`]), and candidates are fetched in bounded
//! multi-get batches before classification.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use sui_kiosk_transport::{with_retry, ObjectClient, ObjectDataOptions, Pacer, RawObjectRecord};
use sui_kiosk_types::{ContainerRef, ContentItem, ObjectId};
use tracing::{debug, warn};

use crate::classify::Classifier;
use crate::config::DiscoveryConfig;
use crate::item_ref::ItemRef;

#[derive(Clone)]
pub struct ContentResolver {
    client: Arc<dyn ObjectClient>,
    config: Arc<DiscoveryConfig>,
    classifier: Classifier,
}

impl ContentResolver {
    pub fn new(client: Arc<dyn ObjectClient>, config: Arc<DiscoveryConfig>) -> Self {
        let classifier = Classifier::new(&config.content_markers);
        Self {
            client,
            config,
            classifier,
        }
    }

    /// Items in `kiosk`.
    ///
    /// Fails only when the dynamic-field index itself cannot be paginated.
    /// Entries without an item id and item batches that stay failing after
    /// their retries are skipped.
    pub async fn resolve(&self, kiosk: &ObjectId) -> Result<Vec<ContentItem>> {
        let candidates = self.candidates(kiosk).await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.fetch(kiosk, &candidates).await;
        let container = ContainerRef::Kiosk(kiosk.clone());
        let items: Vec<ContentItem> = records
            .iter()
            .filter_map(|record| self.classifier.to_item(record, container.clone()))
            .collect();

        debug!(
            kiosk = %kiosk.short(),
            candidates = candidates.len(),
            fetched = records.len(),
            items = items.len(),
            "kiosk content resolved"
        );
        Ok(items)
    }

    /// Unique candidate ids from the kiosk's dynamic-field index, in index order.
    async fn candidates(&self, kiosk: &ObjectId) -> Result<Vec<ObjectId>> {
        let limit = self.config.dynamic_field_page_size;
        let client = self.client.as_ref();
        let entries = self
            .config
            .paginator()
            .collect_all("dynamic_fields", |cursor| {
                client.get_dynamic_fields(kiosk, cursor, limit)
            })
            .await?;

        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        let mut unresolved = 0usize;
        for entry in &entries {
            match ItemRef::resolve(entry) {
                Some(item) => {
                    let id = item.into_id();
                    if seen.insert(id.clone()) {
                        ids.push(id);
                    }
                }
                None => unresolved += 1,
            }
        }
        if unresolved > 0 {
            debug!(kiosk = %kiosk, unresolved, "dynamic field entries without an item id");
        }
        Ok(ids)
    }

    async fn fetch(&self, kiosk: &ObjectId, ids: &[ObjectId]) -> Vec<RawObjectRecord> {
        let options = ObjectDataOptions::new().with_type().with_display();
        let client = self.client.as_ref();
        let mut pacer = Pacer::new(self.config.retry.call_delay);
        let mut records = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(self.config.batch_size()) {
            pacer.tick().await;
            let fetched = with_retry(&self.config.retry, "multi_get_objects", || {
                client.multi_get_objects(chunk, options)
            })
            .await;
            match fetched {
                Ok(batch) => records.extend(batch),
                Err(err) => warn!(
                    kiosk = %kiosk,
                    batch = chunk.len(),
                    error = %err,
                    "item batch fetch failed, skipping batch"
                ),
            }
        }
        records
    }
}
