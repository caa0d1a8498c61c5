//! Raw records returned by the remote service.
//!
//! These are transient: resolvers read them and then drop them. Ids are kept
//! as raw strings here; validation happens where an id is used as a key.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sui_kiosk_types::DisplayMetadata;

/// An object as returned by `sui_getObject` and friends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObjectRecord {
    pub object_id: String,
    /// Move type, e.g. `0x2::kiosk::KioskOwnerCap`. Present with `showType`.
    pub type_tag: Option<String>,
    /// `content.fields` of a Move object. Present with `showContent`.
    pub fields: Option<Value>,
    /// Present with `showDisplay` when the type has a Display registered.
    pub display: Option<DisplayMetadata>,
    /// Present with `showOwner`.
    pub owner: Option<Value>,
}

impl RawObjectRecord {
    pub fn new(object_id: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            type_tag: Some(type_tag.into()),
            ..Default::default()
        }
    }

    pub fn with_fields(mut self, fields: Value) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_display(mut self, display: DisplayMetadata) -> Self {
        self.display = Some(display);
        self
    }

    /// A top-level content field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.as_ref()?.get(name)
    }

    pub fn type_tag(&self) -> &str {
        self.type_tag.as_deref().unwrap_or("")
    }

    /// Parse an object response.
    ///
    /// Accepts both the `{ "data": {..} }` envelope and a bare data object.
    /// Returns `None` for error envelopes (`notExists`, `deleted`) and for
    /// anything without an object id.
    pub fn from_json(value: &Value) -> Option<Self> {
        let data = match value.get("data") {
            Some(Value::Null) => return None,
            Some(inner) => inner,
            None if value.get("error").is_some() => return None,
            None => value,
        };

        let object_id = data.get("objectId").and_then(Value::as_str)?.to_string();
        let content = data.get("content");
        let type_tag = data
            .get("type")
            .and_then(Value::as_str)
            .or_else(|| content.and_then(|c| c.get("type")).and_then(Value::as_str))
            .map(String::from);
        let fields = content.and_then(|c| c.get("fields")).cloned();
        let display = data.get("display").and_then(parse_display);
        let owner = data.get("owner").filter(|o| !o.is_null()).cloned();

        Some(Self {
            object_id,
            type_tag,
            fields,
            display,
            owner,
        })
    }
}

fn string_field(map: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| map.get(*k).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
        .map(String::from)
}

/// Parse the `display` block (`{ "data": {..} | null, "error": .. }`).
fn parse_display(display: &Value) -> Option<DisplayMetadata> {
    let data = display.get("data").unwrap_or(display);
    if !data.is_object() {
        return None;
    }
    let meta = DisplayMetadata {
        name: string_field(data, &["name"]),
        description: string_field(data, &["description"]),
        image_url: string_field(data, &["image_url", "imageUrl", "img_url"]),
    };
    if meta == DisplayMetadata::default() {
        None
    } else {
        Some(meta)
    }
}

/// Whether a dynamic-field entry stores its value inline or as a separate object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// `dynamic_field`: the entry's object id is the `Field<K, V>` wrapper.
    DynamicField,
    /// `dynamic_object_field`: the entry's object id is the child object itself.
    DynamicObject,
}

/// One entry of a parent's dynamic-field index (`suix_getDynamicFields`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicFieldEntry {
    pub object_id: Option<String>,
    pub kind: Option<FieldKind>,
    /// Type of the key, e.g. `0x2::kiosk::Item`.
    pub name_type: Option<String>,
    /// JSON value of the key.
    pub name_value: Option<Value>,
    pub object_type: Option<String>,
}

impl DynamicFieldEntry {
    pub fn from_json(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let name = value.get("name");
        let kind = match value.get("type").and_then(Value::as_str) {
            Some("DynamicObject") => Some(FieldKind::DynamicObject),
            Some("DynamicField") => Some(FieldKind::DynamicField),
            _ => None,
        };
        Some(Self {
            object_id: value
                .get("objectId")
                .and_then(Value::as_str)
                .map(String::from),
            kind,
            name_type: name
                .and_then(|n| n.get("type"))
                .and_then(Value::as_str)
                .map(String::from),
            name_value: name.and_then(|n| n.get("value")).cloned(),
            object_type: value
                .get("objectType")
                .and_then(Value::as_str)
                .map(String::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object_envelope() {
        let response = json!({
            "data": {
                "objectId": "0xabc",
                "version": "12",
                "type": "0x2::kiosk::KioskOwnerCap",
                "content": {
                    "dataType": "moveObject",
                    "type": "0x2::kiosk::KioskOwnerCap",
                    "fields": { "for": "0xdef", "id": { "id": "0xabc" } }
                },
                "display": { "data": null, "error": null },
                "owner": { "AddressOwner": "0x1" }
            }
        });
        let rec = RawObjectRecord::from_json(&response).unwrap();
        assert_eq!(rec.object_id, "0xabc");
        assert_eq!(rec.type_tag(), "0x2::kiosk::KioskOwnerCap");
        assert_eq!(rec.field("for"), Some(&json!("0xdef")));
        assert!(rec.display.is_none());
        assert!(rec.owner.is_some());
    }

    #[test]
    fn test_parse_error_envelope() {
        let missing = json!({ "error": { "code": "notExists", "object_id": "0x1" } });
        assert!(RawObjectRecord::from_json(&missing).is_none());
        assert!(RawObjectRecord::from_json(&json!({ "data": null })).is_none());
    }

    #[test]
    fn test_type_falls_back_to_content_type() {
        let bare = json!({
            "objectId": "0x1",
            "content": { "type": "0xa::nft::Nft", "fields": {} }
        });
        let rec = RawObjectRecord::from_json(&bare).unwrap();
        assert_eq!(rec.type_tag(), "0xa::nft::Nft");
    }

    #[test]
    fn test_parse_display_aliases() {
        let response = json!({
            "objectId": "0x1",
            "display": { "data": { "name": "Capy #1", "imageUrl": "https://x/1.png" } }
        });
        let rec = RawObjectRecord::from_json(&response).unwrap();
        let display = rec.display.unwrap();
        assert_eq!(display.name.as_deref(), Some("Capy #1"));
        assert_eq!(display.image_url.as_deref(), Some("https://x/1.png"));
        assert!(display.description.is_none());
    }

    #[test]
    fn test_parse_dynamic_field_entry() {
        let entry = json!({
            "name": { "type": "0x2::kiosk::Item", "value": { "id": "0x77" } },
            "bcsName": "abc",
            "type": "DynamicObject",
            "objectType": "0xa::nft::Nft",
            "objectId": "0x77",
            "version": 3,
            "digest": "d"
        });
        let parsed = DynamicFieldEntry::from_json(&entry).unwrap();
        assert_eq!(parsed.kind, Some(FieldKind::DynamicObject));
        assert_eq!(parsed.object_id.as_deref(), Some("0x77"));
        assert_eq!(parsed.name_type.as_deref(), Some("0x2::kiosk::Item"));
        assert_eq!(parsed.name_value, Some(json!({ "id": "0x77" })));
        assert!(DynamicFieldEntry::from_json(&json!("nope")).is_none());
    }
}
