//! Discovery data model.
//!
//! Everything here is recomputed on every discovery run; nothing is cached
//! across runs. [`DiscoveryResult`] and [`ReconciliationTarget`] are the only
//! shapes handed onward to the transaction builder, so their serde layout
//! (camelCase) is part of the produced interface.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::address::{Address, ObjectId};

/// Wire value of [`ContainerRef::Direct`].
pub const DIRECT_OWNERSHIP: &str = "direct-ownership";

/// Proof of control over exactly one kiosk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerCapability {
    pub capability_id: ObjectId,
    pub container_id: ObjectId,
    /// 0 when the kiosk could not be read.
    pub item_count: u64,
}

/// Display block fields the classifier looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl DisplayMetadata {
    /// `true` when a non-empty name or image is present.
    pub fn is_meaningful(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.name) || present(&self.image_url)
    }
}

/// Where a content item was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContainerRef {
    /// Placed inside this kiosk.
    Kiosk(ObjectId),
    /// Held directly by the wallet.
    Direct,
}

impl ContainerRef {
    pub fn kiosk_id(&self) -> Option<&ObjectId> {
        match self {
            ContainerRef::Kiosk(id) => Some(id),
            ContainerRef::Direct => None,
        }
    }
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerRef::Kiosk(id) => write!(f, "{}", id),
            ContainerRef::Direct => f.write_str(DIRECT_OWNERSHIP),
        }
    }
}

impl Serialize for ContainerRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ContainerRef::Kiosk(id) => serializer.serialize_str(id.as_str()),
            ContainerRef::Direct => serializer.serialize_str(DIRECT_OWNERSHIP),
        }
    }
}

impl<'de> Deserialize<'de> for ContainerRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == DIRECT_OWNERSHIP {
            return Ok(ContainerRef::Direct);
        }
        ObjectId::parse(&raw)
            .map(ContainerRef::Kiosk)
            .map_err(de::Error::custom)
    }
}

/// One discovered collectible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub item_id: ObjectId,
    pub type_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayMetadata>,
    pub container_id: ContainerRef,
}

/// Output of one batch discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryResult {
    pub containers: Vec<ContainerCapability>,
    pub items: Vec<ContentItem>,
}

impl DiscoveryResult {
    /// Items placed in the given kiosk.
    pub fn items_in<'a>(&'a self, kiosk: &'a ObjectId) -> impl Iterator<Item = &'a ContentItem> {
        self.items
            .iter()
            .filter(move |item| item.container_id.kiosk_id() == Some(kiosk))
    }

    /// Items held directly by the wallet.
    pub fn direct_items(&self) -> impl Iterator<Item = &ContentItem> {
        self.items
            .iter()
            .filter(|item| item.container_id == ContainerRef::Direct)
    }
}

/// Incremental update emitted by progressive discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscoveryUpdate {
    Containers(Vec<ContainerCapability>),
    Items(Vec<ContentItem>),
    Done,
}

/// Lifecycle of a planner target. `Success` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Pending,
    Processing,
    Success,
    Failed,
}

impl TargetStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TargetStatus::Success | TargetStatus::Failed)
    }
}

/// One address in a bulk reconciliation plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationTarget {
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_id: Option<ObjectId>,
    pub has_container: bool,
    pub status: TargetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReconciliationTarget {
    pub fn pending(address: Address) -> Self {
        Self {
            address,
            container_id: None,
            capability_id: None,
            has_container: false,
            status: TargetStatus::Pending,
            error: None,
        }
    }

    /// Record the outcome of capability resolution. The first capability, if
    /// any, becomes the target's existing kiosk.
    pub fn resolve(&mut self, first_capability: Option<&ContainerCapability>) {
        if let Some(cap) = first_capability {
            self.container_id = Some(cap.container_id.clone());
            self.capability_id = Some(cap.capability_id.clone());
            self.has_container = true;
        } else {
            self.container_id = None;
            self.capability_id = None;
            self.has_container = false;
        }
        self.status = TargetStatus::Success;
        self.error = None;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = TargetStatus::Failed;
        self.error = Some(error.into());
    }
}
