//! Whole-wallet discovery.
//!
//! [`Discovery`] ties the resolvers together for one endpoint. A run first
//! resolves the wallet's capabilities; failing that is the only fatal error.
//! Content resolution for every kiosk then fans out concurrently alongside
//! the direct-ownership scan, and both feed a first-seen-wins merge keyed by
//! item id in which kiosk placement always comes first. Failures below the
//! capability step only shrink the result.
//!
//! A `Discovery` is bound to one client for its whole life. Switching
//! networks means building a new one; results of a run on the old client are
//! the caller's to discard.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use sui_kiosk_transport::ObjectClient;
use sui_kiosk_types::{
    Address, ContainerCapability, ContentItem, DiscoveryError, DiscoveryResult, DiscoveryUpdate,
    ObjectId,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::capability::{CapabilityResolver, CapabilityScan};
use crate::config::{DiscoveryConfig, PlannerConfig};
use crate::content::ContentResolver;
use crate::direct::DirectOwnershipResolver;
use crate::planner::ReconciliationPlanner;

/// Concatenate item batches, keeping the first item seen for each id.
pub fn merge_items<I>(batches: I) -> Vec<ContentItem>
where
    I: IntoIterator<Item = Vec<ContentItem>>,
{
    let mut seen = HashSet::new();
    batches
        .into_iter()
        .flatten()
        .filter(|item| seen.insert(item.item_id.clone()))
        .collect()
}

/// Items of `batch` whose ids are not yet in `seen`.
fn unseen(batch: Vec<ContentItem>, seen: &mut HashSet<ObjectId>) -> Vec<ContentItem> {
    batch
        .into_iter()
        .filter(|item| seen.insert(item.item_id.clone()))
        .collect()
}

/// What the progressive producers hand to the consumer.
enum Produced {
    Container(Vec<ContentItem>),
    /// Every kiosk has been resolved.
    ContainersDone,
    Direct(Vec<ContentItem>),
}

/// Distinct kiosk ids, in capability order.
fn kiosk_ids(capabilities: &[ContainerCapability]) -> Vec<ObjectId> {
    let mut seen = HashSet::new();
    capabilities
        .iter()
        .map(|cap| cap.container_id.clone())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

#[derive(Clone)]
pub struct Discovery {
    config: Arc<DiscoveryConfig>,
    capabilities: CapabilityResolver,
    content: ContentResolver,
    direct: DirectOwnershipResolver,
}

impl Discovery {
    pub fn new(client: Arc<dyn ObjectClient>, config: DiscoveryConfig) -> Self {
        let config = Arc::new(config);
        Self {
            capabilities: CapabilityResolver::new(client.clone(), config.clone()),
            content: ContentResolver::new(client.clone(), config.clone()),
            direct: DirectOwnershipResolver::new(client, config.clone()),
            config,
        }
    }

    pub fn capabilities(&self) -> &CapabilityResolver {
        &self.capabilities
    }

    /// Bulk planner sharing this endpoint and configuration.
    pub fn planner(&self, config: PlannerConfig) -> ReconciliationPlanner {
        ReconciliationPlanner::new(self.capabilities.clone(), config)
    }

    async fn scan_capabilities(&self, owner: &Address) -> Result<CapabilityScan, DiscoveryError> {
        self.capabilities
            .scan(owner, DirectOwnershipResolver::options())
            .await
            .map_err(|err| DiscoveryError::from_remote(&err).with_context("address", owner))
    }

    /// Discover every kiosk and collectible of `address`.
    ///
    /// # Errors
    ///
    /// A malformed address, or capability resolution exhausting both of its
    /// strategies. Everything else degrades to a partial result.
    pub async fn discover(&self, address: &str) -> Result<DiscoveryResult, DiscoveryError> {
        let owner = Address::parse(address)?;
        let CapabilityScan {
            capabilities,
            owned,
        } = self.scan_capabilities(&owner).await?;
        let kiosks = kiosk_ids(&capabilities);

        let containers = async {
            let resolved: Vec<_> = stream::iter(kiosks.iter())
                .map(|kiosk| async move { (kiosk, self.content.resolve(kiosk).await) })
                .buffered(self.config.container_concurrency.max(1))
                .collect()
                .await;
            let mut failed = 0usize;
            let mut batches = Vec::with_capacity(resolved.len());
            for (kiosk, outcome) in resolved {
                match outcome {
                    Ok(items) => batches.push(items),
                    Err(err) => {
                        failed += 1;
                        warn!(kiosk = %kiosk, error = %err, "kiosk content resolution failed");
                    }
                }
            }
            (batches, failed)
        };

        let direct = async {
            match owned.as_deref() {
                Some(records) => {
                    debug!(owner = %owner, "classifying owned objects from capability scan");
                    self.direct.classify(records)
                }
                None => self.direct.resolve(&owner).await.unwrap_or_else(|err| {
                    warn!(owner = %owner, error = %err, "direct ownership scan failed");
                    Vec::new()
                }),
            }
        };

        let ((mut batches, failed), direct_items) = tokio::join!(containers, direct);
        // Kiosk placement wins over direct ownership.
        batches.push(direct_items);
        let items = merge_items(batches);

        info!(
            address = %owner,
            containers = capabilities.len(),
            items = items.len(),
            failed_containers = failed,
            "discovery complete"
        );
        Ok(DiscoveryResult {
            containers: capabilities,
            items,
        })
    }

    /// Discover `address`, reporting progress through `on_update`.
    ///
    /// Capabilities are reported first as one [`DiscoveryUpdate::Containers`].
    /// Kiosk item batches then arrive as each kiosk resolves, in no particular
    /// order. Directly owned items are held back until every kiosk has been
    /// resolved, so an item reachable both ways is always credited to its
    /// kiosk, exactly as in [`Discovery::discover`]. Each item is reported at
    /// most once. The last update is always [`DiscoveryUpdate::Done`] unless
    /// the capability step fails, in which case nothing is reported and the
    /// error is returned.
    pub async fn discover_progressive<F>(
        &self,
        address: &str,
        mut on_update: F,
    ) -> Result<(), DiscoveryError>
    where
        F: FnMut(DiscoveryUpdate),
    {
        let owner = Address::parse(address)?;
        let CapabilityScan {
            capabilities,
            owned,
        } = self.scan_capabilities(&owner).await?;
        let kiosks = kiosk_ids(&capabilities);
        let container_count = capabilities.len();
        on_update(DiscoveryUpdate::Containers(capabilities));

        let (tx, mut rx) = mpsc::unbounded_channel::<Produced>();
        let owner = &owner;

        let containers = {
            let tx = tx.clone();
            let kiosks = &kiosks;
            async move {
                let mut resolving = stream::iter(kiosks.iter())
                    .map(|kiosk| async move { (kiosk, self.content.resolve(kiosk).await) })
                    .buffer_unordered(self.config.container_concurrency.max(1));
                let mut failed = 0usize;
                while let Some((kiosk, outcome)) = resolving.next().await {
                    match outcome {
                        Ok(items) if !items.is_empty() => {
                            let _ = tx.send(Produced::Container(items));
                        }
                        Ok(_) => {}
                        Err(err) => {
                            failed += 1;
                            warn!(kiosk = %kiosk, error = %err, "kiosk content resolution failed");
                        }
                    }
                }
                let _ = tx.send(Produced::ContainersDone);
                failed
            }
        };

        let direct = {
            let tx = tx.clone();
            async move {
                match owned {
                    Some(records) => {
                        let items = self.direct.classify(&records);
                        if !items.is_empty() {
                            let _ = tx.send(Produced::Direct(items));
                        }
                    }
                    None => {
                        let streamed = self
                            .direct
                            .stream(owner, |items| {
                                if !items.is_empty() {
                                    let _ = tx.send(Produced::Direct(items));
                                }
                            })
                            .await;
                        if let Err(err) = streamed {
                            warn!(owner = %owner, error = %err, "direct ownership scan failed");
                        }
                    }
                }
            }
        };

        // Only the producers hold senders now; the receiver ends when both finish.
        drop(tx);

        let consume = async {
            let mut seen = HashSet::new();
            // Direct batches waiting on the kiosk fan-out; `None` once it is done.
            let mut held: Option<Vec<Vec<ContentItem>>> = Some(Vec::new());
            let mut emitted = 0usize;
            while let Some(produced) = rx.recv().await {
                let ready = match produced {
                    Produced::Container(batch) => vec![batch],
                    Produced::Direct(batch) => match held.as_mut() {
                        Some(pending) => {
                            pending.push(batch);
                            continue;
                        }
                        None => vec![batch],
                    },
                    Produced::ContainersDone => held.take().unwrap_or_default(),
                };
                for batch in ready {
                    let fresh = unseen(batch, &mut seen);
                    if !fresh.is_empty() {
                        emitted += fresh.len();
                        on_update(DiscoveryUpdate::Items(fresh));
                    }
                }
            }
            emitted
        };

        let (failed, (), emitted) = tokio::join!(containers, direct, consume);
        info!(
            address = %owner,
            containers = container_count,
            items = emitted,
            failed_containers = failed,
            "progressive discovery complete"
        );
        on_update(DiscoveryUpdate::Done);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sui_kiosk_transport::fixture::{self, FixtureClient, Op};
    use sui_kiosk_types::{ContainerRef, ErrorCode, RetryConfig};

    fn discovery(client: FixtureClient) -> Discovery {
        Discovery::new(
            Arc::new(client),
            DiscoveryConfig::default().with_retry(RetryConfig::immediate(3)),
        )
    }

    fn item(n: u8, container: ContainerRef) -> ContentItem {
        ContentItem {
            item_id: fixture::id(n),
            type_tag: "0xcafe::collection::Nft".into(),
            display: None,
            container_id: container,
        }
    }

    #[test]
    fn test_merge_first_seen_wins() {
        let kiosk = ContainerRef::Kiosk(fixture::id(100));
        let merged = merge_items(vec![
            vec![item(1, kiosk.clone()), item(2, kiosk.clone())],
            vec![item(2, ContainerRef::Direct), item(3, ContainerRef::Direct)],
        ]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1].container_id, kiosk);
    }

    #[test]
    fn test_merge_is_idempotent_on_duplicates() {
        let batch = vec![item(1, ContainerRef::Direct), item(2, ContainerRef::Direct)];
        let once = merge_items(vec![batch.clone()]);
        let twice = merge_items(vec![batch.clone(), batch]);
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_invalid_address_makes_no_calls() {
        let client = Arc::new(FixtureClient::new());
        let discovery = Discovery::new(client.clone(), DiscoveryConfig::default());
        let err = discovery.discover("0x2").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(client.calls(Op::OwnedFiltered), 0);
        assert_eq!(client.calls(Op::OwnedAll), 0);
    }

    #[tokio::test]
    async fn test_capability_exhaustion_is_fatal() {
        let client = FixtureClient::new()
            .fail_always(Op::OwnedFiltered)
            .fail_always(Op::OwnedAll);
        let wallet = fixture::address(1);
        let err = discovery(client).discover(wallet.as_str()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RemoteExhausted);
        assert_eq!(err.context.get("address"), Some(&wallet.to_string()));
    }

    #[tokio::test]
    async fn test_direct_scan_failure_degrades() {
        let wallet = fixture::address(1);
        let kiosk = fixture::id(20);
        let client = FixtureClient::new()
            .with_owned(&wallet, fixture::owner_cap(&fixture::id(10), &kiosk))
            .with_object(fixture::kiosk(&kiosk, 1))
            .with_object(fixture::nft(&fixture::id(30), "thirty"))
            .with_dynamic_field(&kiosk, fixture::item_entry(&fixture::id(30)))
            .fail_always(Op::OwnedAll);

        let result = discovery(client).discover(wallet.as_str()).await.unwrap();
        assert_eq!(result.containers.len(), 1);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items_in(&kiosk).count(), 1);
    }

    #[tokio::test]
    async fn test_progressive_ends_with_done() {
        let wallet = fixture::address(1);
        let client = FixtureClient::new().with_owned(&wallet, fixture::nft(&fixture::id(5), "five"));
        let mut updates = Vec::new();
        discovery(client)
            .discover_progressive(wallet.as_str(), |u| updates.push(u))
            .await
            .unwrap();
        assert_eq!(updates.first(), Some(&DiscoveryUpdate::Containers(Vec::new())));
        assert_eq!(updates.last(), Some(&DiscoveryUpdate::Done));
        assert_eq!(updates.len(), 3);
    }

    #[tokio::test]
    async fn test_progressive_fatal_error_reports_nothing() {
        let client = FixtureClient::new()
            .fail_always(Op::OwnedFiltered)
            .fail_always(Op::OwnedAll);
        let mut updates = Vec::new();
        let outcome = discovery(client)
            .discover_progressive(fixture::address(1).as_str(), |u| updates.push(u))
            .await;
        assert!(outcome.is_err());
        assert!(updates.is_empty());
    }
}
