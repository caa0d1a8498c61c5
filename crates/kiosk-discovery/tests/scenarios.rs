//! End-to-end discovery scenarios against the in-memory fixture client.
//!
//! Run with: cargo test -p sui-kiosk-discovery --test scenarios

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use sui_kiosk_discovery::{Discovery, DiscoveryConfig, PlannerConfig};
use sui_kiosk_transport::fixture::{self, FixtureClient, Op};
use sui_kiosk_transport::ObjectDataOptions;
use sui_kiosk_types::{ContainerRef, DiscoveryUpdate, ObjectId, RetryConfig, TargetStatus};

fn config() -> DiscoveryConfig {
    DiscoveryConfig::default().with_retry(RetryConfig::immediate(3))
}

fn discovery(client: Arc<FixtureClient>) -> Discovery {
    Discovery::new(client, config())
}

/// Wallet 1 owns caps for kiosks X (one item) and Y (empty), plus one
/// collectible and one coin held directly.
fn scenario_a() -> (FixtureClient, ObjectId, ObjectId) {
    let wallet = fixture::address(1);
    let x = fixture::id(0x20);
    let y = fixture::id(0x21);
    let client = FixtureClient::new()
        .with_owned(&wallet, fixture::owner_cap(&fixture::id(0x10), &x))
        .with_owned(&wallet, fixture::owner_cap(&fixture::id(0x11), &y))
        .with_owned(&wallet, fixture::nft(&fixture::id(0x31), "loose"))
        .with_owned(&wallet, fixture::coin(&fixture::id(0x40)))
        .with_object(fixture::kiosk(&x, 1))
        .with_object(fixture::kiosk(&y, 0))
        .with_object(fixture::nft(&fixture::id(0x30), "placed"))
        .with_dynamic_field(&x, fixture::item_entry(&fixture::id(0x30)));
    (client, x, y)
}

fn assert_unique_items(items: &[sui_kiosk_types::ContentItem]) {
    let ids: HashSet<_> = items.iter().map(|i| &i.item_id).collect();
    assert_eq!(ids.len(), items.len(), "duplicate item ids in result");
}

#[tokio::test]
async fn test_scenario_a_two_kiosks_and_direct_item() {
    let (client, x, y) = scenario_a();
    let result = discovery(Arc::new(client))
        .discover(fixture::address(1).as_str())
        .await
        .unwrap();

    assert_eq!(result.containers.len(), 2);
    assert_eq!(result.items.len(), 2);
    assert_unique_items(&result.items);

    let placed: Vec<_> = result.items_in(&x).collect();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].item_id, fixture::id(0x30));
    assert_eq!(result.items_in(&y).count(), 0);

    let direct: Vec<_> = result.direct_items().collect();
    assert_eq!(direct.len(), 1);
    assert_eq!(direct[0].container_id, ContainerRef::Direct);

    let x_cap = result.containers.iter().find(|c| c.container_id == x).unwrap();
    assert_eq!(x_cap.item_count, 1);
}

#[tokio::test]
async fn test_scenario_b_filter_failure_falls_back() {
    let (client, _, _) = scenario_a();
    let client = Arc::new(client.fail_always(Op::OwnedFiltered));
    let result = discovery(client.clone())
        .discover(fixture::address(1).as_str())
        .await
        .unwrap();

    assert_eq!(client.calls(Op::OwnedFiltered), 3);
    assert_eq!(result.containers.len(), 2);
    // The fallback scan's pages are reused for direct ownership.
    assert_eq!(client.calls(Op::OwnedAll), 1);
    assert_eq!(result.items.len(), 2);
}

#[tokio::test]
async fn test_fallback_matches_unfiltered_scan() {
    let (healthy, _, _) = scenario_a();
    let (broken, _, _) = scenario_a();
    let wallet = fixture::address(1);

    let expected = discovery(Arc::new(healthy))
        .capabilities()
        .scan_unfiltered(&wallet, ObjectDataOptions::new())
        .await
        .unwrap()
        .capabilities;
    let actual = discovery(Arc::new(broken.fail_always(Op::OwnedFiltered)))
        .capabilities()
        .resolve(&wallet)
        .await
        .unwrap();

    let as_set = |caps: &[sui_kiosk_types::ContainerCapability]| {
        caps.iter().cloned().collect::<HashSet<_>>()
    };
    assert_eq!(as_set(&actual), as_set(&expected));
}

#[tokio::test]
async fn test_scenario_c_unresolvable_entry_is_skipped() {
    let (client, x, _) = scenario_a();
    let client = client.with_dynamic_field(
        &x,
        fixture::field_entry(
            Some(&fixture::id(0x50)),
            json!({ "value": "not-an-id", "item": { "kind": 3 } }),
        ),
    );
    let result = discovery(Arc::new(client))
        .discover(fixture::address(1).as_str())
        .await
        .unwrap();

    assert_eq!(result.items_in(&x).count(), 1);
    assert_eq!(result.items.len(), 2);
}

#[tokio::test]
async fn test_failed_kiosk_does_not_abort_siblings() {
    let (client, x, y) = scenario_a();
    let client = client
        .with_object(fixture::nft(&fixture::id(0x32), "other"))
        .with_dynamic_field(&y, fixture::item_entry(&fixture::id(0x32)))
        .fail_for(&x);
    let result = discovery(Arc::new(client))
        .discover(fixture::address(1).as_str())
        .await
        .unwrap();

    assert_eq!(result.containers.len(), 2);
    assert_eq!(result.items_in(&x).count(), 0);
    assert_eq!(result.items_in(&y).count(), 1);
    assert_eq!(result.direct_items().count(), 1);
}

#[tokio::test]
async fn test_item_in_kiosk_and_owned_reported_once() {
    let (client, x, _) = scenario_a();
    // Same collectible reachable both ways: kiosk placement wins.
    let client = client.with_dynamic_field(&x, fixture::item_entry(&fixture::id(0x31)));
    let result = discovery(Arc::new(client))
        .discover(fixture::address(1).as_str())
        .await
        .unwrap();

    assert_unique_items(&result.items);
    let shared = result
        .items
        .iter()
        .find(|i| i.item_id == fixture::id(0x31))
        .unwrap();
    assert_eq!(shared.container_id, ContainerRef::Kiosk(x));
}

#[tokio::test]
async fn test_progressive_credits_shared_item_to_slow_kiosk() {
    let (client, x, _) = scenario_a();
    let client = client.with_dynamic_field(&x, fixture::item_entry(&fixture::id(0x31)));
    // One entry per index page and a paced loop: the kiosk resolves well
    // after the single owned-object page.
    let config = DiscoveryConfig {
        dynamic_field_page_size: 1,
        ..config()
    }
    .with_retry(RetryConfig::new(3, 0, 50));
    let discovery = Discovery::new(Arc::new(client), config);
    let wallet = fixture::address(1);

    let batch = discovery.discover(wallet.as_str()).await.unwrap();
    let mut updates = Vec::new();
    discovery
        .discover_progressive(wallet.as_str(), |u| updates.push(u))
        .await
        .unwrap();

    let streamed: Vec<_> = updates
        .into_iter()
        .filter_map(|u| match u {
            DiscoveryUpdate::Items(items) => Some(items),
            _ => None,
        })
        .flatten()
        .collect();
    assert_unique_items(&streamed);
    let placement = |items: &[sui_kiosk_types::ContentItem]| {
        items
            .iter()
            .find(|i| i.item_id == fixture::id(0x31))
            .map(|i| i.container_id.clone())
    };
    assert_eq!(placement(&batch.items[..]), Some(ContainerRef::Kiosk(x.clone())));
    assert_eq!(placement(&streamed[..]), Some(ContainerRef::Kiosk(x)));
}

#[tokio::test]
async fn test_progressive_matches_batch() {
    let (client, _, _) = scenario_a();
    let discovery = discovery(Arc::new(client));
    let wallet = fixture::address(1);

    let batch = discovery.discover(wallet.as_str()).await.unwrap();

    let mut updates = Vec::new();
    discovery
        .discover_progressive(wallet.as_str(), |u| updates.push(u))
        .await
        .unwrap();

    match updates.first() {
        Some(DiscoveryUpdate::Containers(caps)) => assert_eq!(caps.len(), 2),
        other => panic!("expected containers first, got {:?}", other),
    }
    assert_eq!(updates.last(), Some(&DiscoveryUpdate::Done));

    let streamed: Vec<_> = updates
        .into_iter()
        .filter_map(|u| match u {
            DiscoveryUpdate::Items(items) => Some(items),
            _ => None,
        })
        .flatten()
        .collect();
    assert_unique_items(&streamed);
    let streamed_ids: HashSet<_> = streamed.iter().map(|i| i.item_id.clone()).collect();
    let batch_ids: HashSet<_> = batch.items.iter().map(|i| i.item_id.clone()).collect();
    assert_eq!(streamed_ids, batch_ids);
}

#[tokio::test]
async fn test_scenario_d_planner_partial_failure() {
    let (client, _, _) = scenario_a();
    let client = client.fail_for(fixture::address(2));
    let planner = discovery(Arc::new(client)).planner(PlannerConfig {
        batch_delay: Duration::ZERO,
        ..PlannerConfig::default()
    });

    let addresses = [fixture::address(1), fixture::address(2), fixture::address(3)];
    let input: Vec<&str> = addresses.iter().map(|a| a.as_str()).collect();
    let targets = planner.prepare(&input).await.unwrap();

    assert_eq!(targets.len(), 3);
    assert_eq!(targets[0].status, TargetStatus::Success);
    assert!(targets[0].has_container);
    assert_eq!(targets[1].status, TargetStatus::Failed);
    assert!(targets[1].error.as_deref().is_some_and(|e| !e.is_empty()));
    assert_eq!(targets[2].status, TargetStatus::Success);
    assert!(!targets[2].has_container);
}
