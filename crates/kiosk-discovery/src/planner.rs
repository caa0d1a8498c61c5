//! Bulk reconciliation planning.
//!
//! For a list of wallets, find out which already own a kiosk (to be reused)
//! and which need one created. The resulting targets are what the transaction
//! builder consumes.

use std::collections::HashSet;

use futures::future::join_all;
use serde::Serialize;
use sui_kiosk_transport::Pacer;
use sui_kiosk_types::{
    Address, DiscoveryError, ErrorCode, ReconciliationTarget, TargetStatus,
};
use tracing::{debug, info, warn};

use crate::capability::CapabilityResolver;
use crate::config::PlannerConfig;

/// Outcome counts of a prepared plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    /// Targets with an existing kiosk.
    pub reusable: usize,
    /// Resolved targets without a kiosk.
    pub needs_container: usize,
    pub failed: usize,
}

impl PlanSummary {
    pub fn of(targets: &[ReconciliationTarget]) -> Self {
        targets.iter().fold(Self::default(), |mut acc, t| {
            match t.status {
                TargetStatus::Success if t.has_container => acc.reusable += 1,
                TargetStatus::Success => acc.needs_container += 1,
                TargetStatus::Failed => acc.failed += 1,
                TargetStatus::Pending | TargetStatus::Processing => {}
            }
            acc
        })
    }
}

#[derive(Clone)]
pub struct ReconciliationPlanner {
    capabilities: CapabilityResolver,
    config: PlannerConfig,
}

impl ReconciliationPlanner {
    pub fn new(capabilities: CapabilityResolver, config: PlannerConfig) -> Self {
        Self {
            capabilities,
            config,
        }
    }

    /// Resolve the existing kiosk, if any, of every address.
    ///
    /// Malformed entries are dropped with a warning and duplicates (after
    /// normalization) keep their first occurrence. Each remaining address
    /// yields one target in input order; a failed lookup marks that target
    /// failed without affecting the others.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::TooManyTargets`] when more than `max_targets` entries are
    /// given. No remote call is made in that case.
    pub async fn prepare<S: AsRef<str>>(
        &self,
        addresses: &[S],
    ) -> Result<Vec<ReconciliationTarget>, DiscoveryError> {
        let max = self.config.max_targets;
        if addresses.len() > max {
            return Err(DiscoveryError::new(
                ErrorCode::TooManyTargets,
                format!("{} addresses exceeds the limit of {}", addresses.len(), max),
            )
            .with_context("count", addresses.len())
            .with_context("max", max));
        }

        let mut targets = normalize(addresses);
        let mut pacer = Pacer::new(self.config.batch_delay);

        for (index, batch) in targets.chunks_mut(self.config.batch_size.max(1)).enumerate() {
            pacer.tick().await;
            debug!(batch = index, size = batch.len(), "resolving planner batch");
            for target in batch.iter_mut() {
                target.status = TargetStatus::Processing;
            }

            let outcomes = join_all(
                batch
                    .iter()
                    .map(|target| self.capabilities.resolve(&target.address)),
            )
            .await;

            for (target, outcome) in batch.iter_mut().zip(outcomes) {
                match outcome {
                    Ok(capabilities) => target.resolve(capabilities.first()),
                    Err(err) => {
                        warn!(address = %target.address, error = %err, "capability lookup failed");
                        target.fail(format!("{:#}", err));
                    }
                }
            }
        }

        let summary = PlanSummary::of(&targets);
        info!(
            targets = targets.len(),
            reusable = summary.reusable,
            needs_container = summary.needs_container,
            failed = summary.failed,
            "reconciliation plan prepared"
        );
        Ok(targets)
    }
}

/// Pending targets for the well-formed, first-seen addresses.
fn normalize<S: AsRef<str>>(addresses: &[S]) -> Vec<ReconciliationTarget> {
    let mut seen = HashSet::new();
    let mut targets = Vec::with_capacity(addresses.len());
    for raw in addresses {
        let raw = raw.as_ref();
        match Address::parse(raw) {
            Ok(address) => {
                if seen.insert(address.clone()) {
                    targets.push(ReconciliationTarget::pending(address));
                } else {
                    debug!(address = %address, "duplicate address dropped");
                }
            }
            Err(err) => warn!(input = raw, error = %err, "malformed address dropped"),
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use sui_kiosk_transport::fixture::{self, FixtureClient, Op};
    use sui_kiosk_types::RetryConfig;

    use crate::config::DiscoveryConfig;

    fn planner(client: Arc<FixtureClient>, config: PlannerConfig) -> ReconciliationPlanner {
        let discovery = DiscoveryConfig::default().with_retry(RetryConfig::immediate(2));
        ReconciliationPlanner::new(CapabilityResolver::new(client, Arc::new(discovery)), config)
    }

    fn quick() -> PlannerConfig {
        PlannerConfig {
            batch_delay: Duration::ZERO,
            ..PlannerConfig::default()
        }
    }

    #[test]
    fn test_normalize_filters_and_dedupes() {
        let a = fixture::address(1).to_string();
        let upper = format!("  0x{}  ", "01".repeat(32).to_uppercase());
        let targets = normalize(&[a.as_str(), "0x2", upper.as_str(), "garbage"]);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].address, fixture::address(1));
        assert_eq!(targets[0].status, TargetStatus::Pending);
    }

    #[tokio::test]
    async fn test_too_many_targets_rejected_before_any_call() {
        let client = Arc::new(FixtureClient::new());
        let config = PlannerConfig {
            max_targets: 2,
            ..quick()
        };
        let input: Vec<String> = (1..=3).map(|n| fixture::address(n).to_string()).collect();
        let err = planner(client.clone(), config).prepare(&input).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TooManyTargets);
        assert_eq!(client.calls(Op::OwnedFiltered), 0);
    }

    #[tokio::test]
    async fn test_first_capability_is_reused() {
        let wallet = fixture::address(1);
        let client = FixtureClient::new()
            .with_owned(&wallet, fixture::owner_cap(&fixture::id(10), &fixture::id(20)))
            .with_object(fixture::kiosk(&fixture::id(20), 0));
        let empty = fixture::address(2);

        let targets = planner(Arc::new(client), quick())
            .prepare(&[wallet.as_str(), empty.as_str()])
            .await
            .unwrap();

        assert_eq!(targets[0].status, TargetStatus::Success);
        assert!(targets[0].has_container);
        assert_eq!(targets[0].container_id, Some(fixture::id(20)));
        assert_eq!(targets[0].capability_id, Some(fixture::id(10)));

        assert_eq!(targets[1].status, TargetStatus::Success);
        assert!(!targets[1].has_container);
        assert!(targets[1].error.is_none());

        let summary = PlanSummary::of(&targets);
        assert_eq!(
            summary,
            PlanSummary {
                reusable: 1,
                needs_container: 1,
                failed: 0
            }
        );
    }

    #[tokio::test]
    async fn test_small_batches_cover_every_target() {
        let client = Arc::new(FixtureClient::new());
        let config = PlannerConfig {
            batch_size: 2,
            ..quick()
        };
        let input: Vec<String> = (1..=5).map(|n| fixture::address(n).to_string()).collect();
        let targets = planner(client.clone(), config).prepare(&input).await.unwrap();
        assert_eq!(targets.len(), 5);
        assert!(targets.iter().all(|t| t.status.is_terminal()));
        assert_eq!(client.calls(Op::OwnedFiltered), 5);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let client = Arc::new(FixtureClient::new());
        let targets = planner(client, quick()).prepare::<&str>(&[]).await.unwrap();
        assert!(targets.is_empty());
    }
}
