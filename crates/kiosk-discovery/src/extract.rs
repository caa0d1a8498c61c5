//! Field extractors for schema-drifting capability and kiosk objects.
//!
//! Different package versions name the kiosk reference differently, so the
//! kiosk id is looked up through an ordered chain of small pure functions.
//! Each extractor returns the raw string it found; [`FieldExtractor::apply`]
//! only accepts it if it is a valid object id.
//!
//! Move structs nested inside content come back as
//! `{ "type": .., "fields": {..} }`, and `UID`s as `{ "id": "0x.." }`; both
//! shapes are unwrapped one level where noted.

use std::fmt;

use serde_json::Value;
use sui_kiosk_types::ObjectId;

/// One named step of the kiosk-id extraction chain.
#[derive(Clone, Copy)]
pub struct FieldExtractor {
    name: &'static str,
    extract: fn(&Value) -> Option<&str>,
}

impl FieldExtractor {
    pub const fn new(name: &'static str, extract: fn(&Value) -> Option<&str>) -> Self {
        Self { name, extract }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run against a record's content fields.
    pub fn apply(&self, fields: &Value) -> Option<ObjectId> {
        let raw = (self.extract)(fields)?;
        if raw.trim().is_empty() {
            return None;
        }
        ObjectId::parse(raw).ok()
    }
}

impl fmt::Debug for FieldExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldExtractor").field(&self.name).finish()
    }
}

/// A string, or the `id` inside a `UID`-shaped object.
fn id_like(value: &Value) -> Option<&str> {
    value
        .as_str()
        .or_else(|| value.get("id").and_then(Value::as_str))
}

/// `fields` of a nested struct value, or the value itself.
fn struct_fields(value: &Value) -> &Value {
    value.get("fields").unwrap_or(value)
}

fn by_for(fields: &Value) -> Option<&str> {
    id_like(fields.get("for")?)
}

fn by_kiosk_id(fields: &Value) -> Option<&str> {
    id_like(fields.get("kiosk_id")?)
}

fn by_kiosk_id_camel(fields: &Value) -> Option<&str> {
    id_like(fields.get("kioskId")?)
}

fn by_kiosk(fields: &Value) -> Option<&str> {
    id_like(fields.get("kiosk")?)
}

/// Plain string only: on Move objects `id` is the object's own `UID`.
fn by_id(fields: &Value) -> Option<&str> {
    fields.get("id")?.as_str()
}

/// Personal kiosk caps wrap the regular owner cap: `cap: Option<KioskOwnerCap>`.
fn by_nested_cap(fields: &Value) -> Option<&str> {
    let cap = fields.get("cap")?;
    by_for(struct_fields(cap))
}

pub const FOR: FieldExtractor = FieldExtractor::new("for", by_for);
pub const KIOSK_ID: FieldExtractor = FieldExtractor::new("kiosk_id", by_kiosk_id);
pub const KIOSK_ID_CAMEL: FieldExtractor = FieldExtractor::new("kioskId", by_kiosk_id_camel);
pub const KIOSK: FieldExtractor = FieldExtractor::new("kiosk", by_kiosk);
pub const ID: FieldExtractor = FieldExtractor::new("id", by_id);
pub const NESTED_CAP: FieldExtractor = FieldExtractor::new("cap.for", by_nested_cap);

pub fn default_container_extractors() -> Vec<FieldExtractor> {
    vec![FOR, KIOSK_ID, KIOSK_ID_CAMEL, KIOSK, ID, NESTED_CAP]
}

/// First extractor in `chain` that yields a valid id, with its name.
pub fn extract_container_id(
    fields: &Value,
    chain: &[FieldExtractor],
) -> Option<(ObjectId, &'static str)> {
    chain
        .iter()
        .find_map(|ex| ex.apply(fields).map(|id| (id, ex.name())))
}

const ITEM_COUNT_FIELDS: [&str; 3] = ["item_count", "itemCount", "items"];

/// Item count of a kiosk object.
///
/// Numbers, numeric strings (u64 fields come back as strings) and arrays
/// (counted) are accepted.
pub fn extract_item_count(fields: &Value) -> Option<u64> {
    ITEM_COUNT_FIELDS.iter().find_map(|name| {
        match fields.get(*name)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            Value::Array(items) => Some(items.len() as u64),
            _ => None,
        }
    })
}
