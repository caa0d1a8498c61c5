//! In-memory object client.
//!
//! [`FixtureClient`] serves a hand-built object graph through the same
//! [`ObjectClient`] trait the JSON-RPC client implements. It counts calls per
//! operation and can be told to fail specific operations, which is how the
//! retry, fallback and partial-failure paths are exercised without a network.
//!
//! # Example
//!
//! ```
//! use sui_kiosk_transport::fixture::{self, FixtureClient};
//!
//! let wallet = fixture::address(1);
//! let client = FixtureClient::new()
//!     .with_owned(&wallet, fixture::owner_cap(&fixture::id(2), &fixture::id(3)))
//!     .with_object(fixture::kiosk(&fixture::id(3), 0));
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use sui_kiosk_types::{Address, DisplayMetadata, ObjectId};

use crate::client::{ObjectClient, ObjectDataOptions, ObjectFilter, OwnedObjectsQuery, Page};
use crate::records::{DynamicFieldEntry, FieldKind, RawObjectRecord};

/// Operations counted and failable by the fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    GetObject,
    MultiGet,
    /// `get_owned_objects` with a server-side filter.
    OwnedFiltered,
    /// `get_owned_objects` without a filter.
    OwnedAll,
    DynamicFields,
}

/// How an injected failure behaves.
#[derive(Debug, Clone, Copy)]
enum Failure {
    Always,
    Times(usize),
}

#[derive(Default)]
struct Counters {
    get_object: AtomicUsize,
    multi_get: AtomicUsize,
    owned_filtered: AtomicUsize,
    owned_all: AtomicUsize,
    dynamic_fields: AtomicUsize,
}

impl Counters {
    fn slot(&self, op: Op) -> &AtomicUsize {
        match op {
            Op::GetObject => &self.get_object,
            Op::MultiGet => &self.multi_get,
            Op::OwnedFiltered => &self.owned_filtered,
            Op::OwnedAll => &self.owned_all,
            Op::DynamicFields => &self.dynamic_fields,
        }
    }
}

/// An [`ObjectClient`] backed by in-memory maps.
#[derive(Default)]
pub struct FixtureClient {
    objects: HashMap<String, RawObjectRecord>,
    owned: HashMap<String, Vec<String>>,
    dynamic_fields: HashMap<String, Vec<DynamicFieldEntry>>,
    op_failures: Mutex<HashMap<Op, Failure>>,
    /// Keys (owner address / parent id / object id) whose calls always fail.
    failing_keys: HashSet<String>,
    counters: Counters,
}

impl FixtureClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object reachable by id.
    pub fn with_object(mut self, record: RawObjectRecord) -> Self {
        self.objects.insert(record.object_id.clone(), record);
        self
    }

    /// Register an object and make `owner` own it.
    pub fn with_owned(mut self, owner: &Address, record: RawObjectRecord) -> Self {
        self.owned
            .entry(owner.to_string())
            .or_default()
            .push(record.object_id.clone());
        self.with_object(record)
    }

    /// Append an entry to `parent`'s dynamic-field index.
    pub fn with_dynamic_field(mut self, parent: &ObjectId, entry: DynamicFieldEntry) -> Self {
        self.dynamic_fields
            .entry(parent.to_string())
            .or_default()
            .push(entry);
        self
    }

    /// Every call of `op` fails.
    pub fn fail_always(self, op: Op) -> Self {
        self.set_failure(op, Failure::Always);
        self
    }

    /// The next `times` calls of `op` fail, later ones succeed.
    pub fn fail_times(self, op: Op, times: usize) -> Self {
        self.set_failure(op, Failure::Times(times));
        self
    }

    /// Every call keyed by this owner, parent or object id fails.
    pub fn fail_for(mut self, key: impl std::fmt::Display) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }

    /// Number of calls made so far for `op`, failed ones included.
    pub fn calls(&self, op: Op) -> usize {
        self.counters.slot(op).load(Ordering::SeqCst)
    }

    fn set_failure(&self, op: Op, failure: Failure) {
        if let Ok(mut map) = self.op_failures.lock() {
            map.insert(op, failure);
        }
    }

    /// Count the call and decide whether it fails.
    fn enter(&self, op: Op, key: &str) -> Result<()> {
        self.counters.slot(op).fetch_add(1, Ordering::SeqCst);
        if self.failing_keys.contains(key) {
            return Err(anyhow!("fixture: injected failure for {}", key));
        }
        let mut map = self
            .op_failures
            .lock()
            .map_err(|_| anyhow!("fixture: failure table poisoned"))?;
        match map.get_mut(&op) {
            Some(Failure::Always) => Err(anyhow!("fixture: injected {:?} failure", op)),
            Some(Failure::Times(n)) if *n > 0 => {
                *n -= 1;
                Err(anyhow!("fixture: injected transient {:?} failure", op))
            }
            _ => Ok(()),
        }
    }

    /// Only keep the blocks the caller asked for.
    fn project(record: &RawObjectRecord, options: ObjectDataOptions) -> RawObjectRecord {
        RawObjectRecord {
            object_id: record.object_id.clone(),
            type_tag: record.type_tag.clone().filter(|_| options.show_type),
            fields: record.fields.clone().filter(|_| options.show_content),
            display: record.display.clone().filter(|_| options.show_display),
            owner: record.owner.clone().filter(|_| options.show_owner),
        }
    }
}

/// Slice `items` into a page using a numeric offset cursor.
fn paginate<T: Clone>(items: &[T], cursor: Option<String>, limit: usize) -> Result<Page<T>> {
    let start = match cursor {
        Some(c) => c
            .parse::<usize>()
            .map_err(|_| anyhow!("fixture: bad cursor {:?}", c))?,
        None => 0,
    };
    let limit = limit.max(1);
    let end = (start + limit).min(items.len());
    let data = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();
    let next_cursor = (end < items.len()).then(|| end.to_string());
    Ok(Page { data, next_cursor })
}

fn matches_filter(record: &RawObjectRecord, filter: &ObjectFilter) -> bool {
    match filter {
        ObjectFilter::StructType(t) => record.type_tag() == t.as_str(),
    }
}

#[async_trait::async_trait]
impl ObjectClient for FixtureClient {
    fn endpoint(&self) -> &str {
        "fixture://memory"
    }

    async fn get_object(
        &self,
        id: &ObjectId,
        options: ObjectDataOptions,
    ) -> Result<Option<RawObjectRecord>> {
        self.enter(Op::GetObject, id.as_str())?;
        Ok(self
            .objects
            .get(id.as_str())
            .map(|r| Self::project(r, options)))
    }

    async fn multi_get_objects(
        &self,
        ids: &[ObjectId],
        options: ObjectDataOptions,
    ) -> Result<Vec<RawObjectRecord>> {
        self.enter(Op::MultiGet, "")?;
        if let Some(bad) = ids.iter().find(|id| self.failing_keys.contains(id.as_str())) {
            return Err(anyhow!("fixture: injected failure for {}", bad));
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.objects.get(id.as_str()))
            .map(|r| Self::project(r, options))
            .collect())
    }

    async fn get_owned_objects(
        &self,
        owner: &Address,
        query: &OwnedObjectsQuery,
        cursor: Option<String>,
        limit: usize,
    ) -> Result<Page<RawObjectRecord>> {
        let op = if query.filter.is_some() {
            Op::OwnedFiltered
        } else {
            Op::OwnedAll
        };
        self.enter(op, owner.as_str())?;
        let records: Vec<RawObjectRecord> = self
            .owned
            .get(owner.as_str())
            .into_iter()
            .flatten()
            .filter_map(|id| self.objects.get(id))
            .filter(|r| query.filter.as_ref().map_or(true, |f| matches_filter(r, f)))
            .map(|r| Self::project(r, query.options))
            .collect();
        paginate(&records, cursor, limit)
    }

    async fn get_dynamic_fields(
        &self,
        parent: &ObjectId,
        cursor: Option<String>,
        limit: usize,
    ) -> Result<Page<DynamicFieldEntry>> {
        self.enter(Op::DynamicFields, parent.as_str())?;
        let entries = self
            .dynamic_fields
            .get(parent.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        paginate(entries, cursor, limit)
    }
}

// ---------------------------------------------------------------------------
// Record builders
// ---------------------------------------------------------------------------

/// Type of the standard kiosk owner capability.
pub const OWNER_CAP_TYPE: &str = "0x2::kiosk::KioskOwnerCap";
/// Type of the kiosk object.
pub const KIOSK_TYPE: &str = "0x2::kiosk::Kiosk";

fn repeated_byte(n: u8) -> String {
    format!("0x{}", format!("{:02x}", n).repeat(32))
}

/// Deterministic 32-byte id whose every byte is `n`.
pub fn id(n: u8) -> ObjectId {
    ObjectId::parse(&repeated_byte(n)).unwrap_or_else(|_| unreachable!("64 hex chars always parse"))
}

/// Wallet address counterpart of [`id`].
pub fn address(n: u8) -> Address {
    Address::parse(&repeated_byte(n)).unwrap_or_else(|_| unreachable!("64 hex chars always parse"))
}

/// A `KioskOwnerCap` pointing at `kiosk` through the `for` field.
pub fn owner_cap(cap: &ObjectId, kiosk: &ObjectId) -> RawObjectRecord {
    RawObjectRecord::new(cap.as_str(), OWNER_CAP_TYPE).with_fields(json!({
        "id": { "id": cap.as_str() },
        "for": kiosk.as_str(),
    }))
}

/// A kiosk with the given `item_count`.
pub fn kiosk(kiosk: &ObjectId, item_count: u64) -> RawObjectRecord {
    RawObjectRecord::new(kiosk.as_str(), KIOSK_TYPE).with_fields(json!({
        "id": { "id": kiosk.as_str() },
        "item_count": item_count,
        "allow_extensions": false,
        "profits": "0",
    }))
}

/// A collectible with a Display name and image.
pub fn nft(item: &ObjectId, name: &str) -> RawObjectRecord {
    RawObjectRecord::new(item.as_str(), "0xcafe::collection::Nft")
        .with_fields(json!({ "id": { "id": item.as_str() }, "name": name }))
        .with_display(DisplayMetadata {
            name: Some(name.to_string()),
            description: None,
            image_url: Some(format!("https://img.example/{}.png", name)),
        })
}

/// A coin, which never classifies as content.
pub fn coin(object: &ObjectId) -> RawObjectRecord {
    RawObjectRecord::new(object.as_str(), "0x2::coin::Coin<0x2::sui::SUI>")
        .with_fields(json!({ "id": { "id": object.as_str() }, "balance": "1000" }))
}

/// The index entry a kiosk holds for a placed item (`0x2::kiosk::Item` key,
/// stored as a dynamic object field).
pub fn item_entry(item: &ObjectId) -> DynamicFieldEntry {
    DynamicFieldEntry {
        object_id: Some(item.to_string()),
        kind: Some(FieldKind::DynamicObject),
        name_type: Some("0x2::kiosk::Item".to_string()),
        name_value: Some(json!({ "id": item.as_str() })),
        object_type: None,
    }
}

/// A plain dynamic field entry with an arbitrary key value.
pub fn field_entry(wrapper: Option<&ObjectId>, name_value: Value) -> DynamicFieldEntry {
    DynamicFieldEntry {
        object_id: wrapper.map(ToString::to_string),
        kind: Some(FieldKind::DynamicField),
        name_type: Some("0x1::string::String".to_string()),
        name_value: Some(name_value),
        object_type: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_owned_pagination_and_counting() {
        let wallet = address(1);
        let mut client = FixtureClient::new();
        for n in 10..15 {
            client = client.with_owned(&wallet, coin(&id(n)));
        }
        let query = OwnedObjectsQuery::new(ObjectDataOptions::new().with_type());

        let first = client
            .get_owned_objects(&wallet, &query, None, 2)
            .await
            .unwrap();
        assert_eq!(first.data.len(), 2);
        assert_eq!(first.next_cursor.as_deref(), Some("2"));

        let last = client
            .get_owned_objects(&wallet, &query, Some("4".into()), 2)
            .await
            .unwrap();
        assert_eq!(last.data.len(), 1);
        assert!(last.next_cursor.is_none());
        assert_eq!(client.calls(Op::OwnedAll), 2);
        assert_eq!(client.calls(Op::OwnedFiltered), 0);
    }

    #[tokio::test]
    async fn test_projection_respects_options() {
        let item = id(7);
        let client = FixtureClient::new().with_object(nft(&item, "seven"));
        let rec = client
            .get_object(&item, ObjectDataOptions::new().with_type())
            .await
            .unwrap()
            .unwrap();
        assert!(rec.type_tag.is_some());
        assert!(rec.fields.is_none());
        assert!(rec.display.is_none());
    }

    #[tokio::test]
    async fn test_fail_times_then_recover() {
        let client = FixtureClient::new().fail_times(Op::GetObject, 1);
        assert!(client
            .get_object(&id(1), ObjectDataOptions::new())
            .await
            .is_err());
        assert!(client
            .get_object(&id(1), ObjectDataOptions::new())
            .await
            .unwrap()
            .is_none());
        assert_eq!(client.calls(Op::GetObject), 2);
    }

    #[tokio::test]
    async fn test_filtered_query_matches_type() {
        let wallet = address(2);
        let client = FixtureClient::new()
            .with_owned(&wallet, owner_cap(&id(3), &id(4)))
            .with_owned(&wallet, coin(&id(5)));
        let query = OwnedObjectsQuery::new(ObjectDataOptions::new().with_type())
            .with_filter(ObjectFilter::StructType(OWNER_CAP_TYPE.into()));
        let page = client
            .get_owned_objects(&wallet, &query, None, 50)
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].object_id, id(3).to_string());
    }
}
