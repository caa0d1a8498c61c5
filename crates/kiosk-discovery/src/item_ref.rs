//! Resolution of kiosk dynamic-field entries to item ids.
//!
//! A kiosk references its items through its dynamic-field index. Depending on
//! how the entry was written, the item id is found in one of four places,
//! tried in a fixed order:
//!
//! 1. [`ItemRef::DirectId`]: the entry's own object id, when the entry is a
//!    dynamic object field (the child is the item itself).
//! 2. [`ItemRef::WrapperValue`]: the key's value is the id (or wraps it in a
//!    `value` field).
//! 3. [`ItemRef::NestedId`]: the key is a struct with an `id` field
//!    (`0x2::kiosk::Item { id }`).
//! 4. [`ItemRef::NestedItemId`]: the key holds an `item` sub-struct with an id.
//!
//! There is no recursion: an entry that matches none of these is skipped.

use serde_json::Value;
use sui_kiosk_transport::{DynamicFieldEntry, FieldKind};
use sui_kiosk_types::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemRef {
    DirectId(ObjectId),
    WrapperValue(ObjectId),
    NestedId(ObjectId),
    NestedItemId(ObjectId),
}

type Step = fn(&DynamicFieldEntry) -> Option<ItemRef>;

const STEPS: [Step; 4] = [direct_id, wrapper_value, nested_id, nested_item_id];

impl ItemRef {
    pub fn into_id(self) -> ObjectId {
        match self {
            ItemRef::DirectId(id)
            | ItemRef::WrapperValue(id)
            | ItemRef::NestedId(id)
            | ItemRef::NestedItemId(id) => id,
        }
    }

    /// First step that yields a valid id.
    pub fn resolve(entry: &DynamicFieldEntry) -> Option<Self> {
        STEPS.iter().find_map(|step| step(entry))
    }
}

fn valid_id(value: Option<&Value>) -> Option<ObjectId> {
    ObjectId::parse(value?.as_str()?).ok()
}

pub fn direct_id(entry: &DynamicFieldEntry) -> Option<ItemRef> {
    if entry.kind == Some(FieldKind::DynamicField) {
        return None;
    }
    let id = ObjectId::parse(entry.object_id.as_deref()?).ok()?;
    Some(ItemRef::DirectId(id))
}

pub fn wrapper_value(entry: &DynamicFieldEntry) -> Option<ItemRef> {
    let value = entry.name_value.as_ref()?;
    valid_id(Some(value))
        .or_else(|| valid_id(value.get("value")))
        .map(ItemRef::WrapperValue)
}

pub fn nested_id(entry: &DynamicFieldEntry) -> Option<ItemRef> {
    let value = entry.name_value.as_ref()?;
    valid_id(value.get("id")).map(ItemRef::NestedId)
}

pub fn nested_item_id(entry: &DynamicFieldEntry) -> Option<ItemRef> {
    let item = entry.name_value.as_ref()?.get("item")?;
    valid_id(item.get("id"))
        .or_else(|| valid_id(Some(item)))
        .map(ItemRef::NestedItemId)
}
