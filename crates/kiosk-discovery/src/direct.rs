//! Collectibles held directly by a wallet, outside any kiosk.

use std::sync::Arc;

use anyhow::Result;
use sui_kiosk_transport::{ObjectClient, ObjectDataOptions, OwnedObjectsQuery, RawObjectRecord};
use sui_kiosk_types::{Address, ContainerRef, ContentItem};

use crate::classify::Classifier;
use crate::config::DiscoveryConfig;

/// Paginate every object owned by `owner`, unfiltered.
pub(crate) async fn list_owned(
    client: &dyn ObjectClient,
    config: &DiscoveryConfig,
    owner: &Address,
    options: ObjectDataOptions,
) -> Result<Vec<RawObjectRecord>> {
    let query = OwnedObjectsQuery::new(options);
    let query = &query;
    let limit = config.owned_page_size;
    config
        .paginator()
        .collect_all("owned_objects", |cursor| {
            client.get_owned_objects(owner, query, cursor, limit)
        })
        .await
}

#[derive(Clone)]
pub struct DirectOwnershipResolver {
    client: Arc<dyn ObjectClient>,
    config: Arc<DiscoveryConfig>,
    classifier: Classifier,
}

impl DirectOwnershipResolver {
    pub fn new(client: Arc<dyn ObjectClient>, config: Arc<DiscoveryConfig>) -> Self {
        let classifier = Classifier::new(&config.content_markers);
        Self {
            client,
            config,
            classifier,
        }
    }

    /// Blocks the classifier reads.
    pub fn options() -> ObjectDataOptions {
        ObjectDataOptions::new().with_type().with_display()
    }

    /// Scan the wallet and classify everything it holds.
    pub async fn resolve(&self, owner: &Address) -> Result<Vec<ContentItem>> {
        let owned = list_owned(self.client.as_ref(), &self.config, owner, Self::options()).await?;
        Ok(self.classify(&owned))
    }

    /// Like [`resolve`](Self::resolve), but hands each page's items to `sink`
    /// as soon as the page arrives. Returns the number of pages scanned.
    pub async fn stream<S>(&self, owner: &Address, mut sink: S) -> Result<usize>
    where
        S: FnMut(Vec<ContentItem>),
    {
        let query = OwnedObjectsQuery::new(Self::options());
        let query = &query;
        let limit = self.config.owned_page_size;
        let client = self.client.as_ref();
        self.config
            .paginator()
            .for_each_page(
                "owned_objects",
                |cursor| client.get_owned_objects(owner, query, cursor, limit),
                |page| sink(self.classify(&page)),
            )
            .await
    }

    /// Classify an already fetched owned-object set. Records need their type
    /// and display blocks.
    pub fn classify(&self, owned: &[RawObjectRecord]) -> Vec<ContentItem> {
        owned
            .iter()
            .filter_map(|record| self.classifier.to_item(record, ContainerRef::Direct))
            .collect()
    }
}
