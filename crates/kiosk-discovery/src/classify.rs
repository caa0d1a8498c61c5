//! Content classification.

use sui_kiosk_transport::RawObjectRecord;
use sui_kiosk_types::{ContainerRef, ContentItem, ObjectId};

/// Local capability heuristic, used when the server-side type filter is
/// unavailable. Case-sensitive.
pub fn is_capability_type(type_tag: &str) -> bool {
    type_tag.contains("kiosk") && (type_tag.contains("OwnerCap") || type_tag.contains("KioskCap"))
}

/// Decides whether an object is a collectible.
///
/// Capability objects never classify as content. Anything else qualifies if
/// its type name contains one of the markers (case-insensitive) or it carries
/// a Display with a name or image.
#[derive(Debug, Clone)]
pub struct Classifier {
    markers: Vec<String>,
}

impl Classifier {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(|m| m.as_ref().to_ascii_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    pub fn is_content(&self, record: &RawObjectRecord) -> bool {
        let type_tag = record.type_tag();
        if is_capability_type(type_tag) {
            return false;
        }
        let lowered = type_tag.to_ascii_lowercase();
        self.markers.iter().any(|m| lowered.contains(m.as_str()))
            || record.display.as_ref().is_some_and(|d| d.is_meaningful())
    }

    /// Build the item for `record` if it classifies as content and has a
    /// valid id.
    pub fn to_item(&self, record: &RawObjectRecord, container: ContainerRef) -> Option<ContentItem> {
        if !self.is_content(record) {
            return None;
        }
        let item_id = ObjectId::parse(&record.object_id).ok()?;
        Some(ContentItem {
            item_id,
            type_tag: record.type_tag().to_string(),
            display: record.display.clone().filter(|d| d.is_meaningful()),
            container_id: container,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONTENT_MARKERS;
    use sui_kiosk_transport::fixture;
    use sui_kiosk_types::DisplayMetadata;

    fn classifier() -> Classifier {
        Classifier::new(DEFAULT_CONTENT_MARKERS)
    }

    #[test]
    fn test_capability_heuristic() {
        assert!(is_capability_type("0x2::kiosk::KioskOwnerCap"));
        assert!(is_capability_type("0xabc::personal_kiosk::PersonalKioskCap"));
        assert!(!is_capability_type("0x2::Kiosk::KioskOwnerCap"));
        assert!(!is_capability_type("0x2::kiosk::Kiosk"));
        assert!(!is_capability_type("0x2::package::Publisher"));
    }

    #[test]
    fn test_marker_match_is_case_insensitive() {
        let rec = RawObjectRecord::new(fixture::id(1).as_str(), "0xa::game::GoldBADGE");
        assert!(classifier().is_content(&rec));
        let rec = RawObjectRecord::new(fixture::id(1).as_str(), "0xa::capy::Capy");
        assert!(!classifier().is_content(&rec));
    }

    #[test]
    fn test_display_makes_content() {
        let rec = RawObjectRecord::new(fixture::id(2).as_str(), "0xa::capy::Capy").with_display(
            DisplayMetadata {
                image_url: Some("https://img/capy.png".into()),
                ..Default::default()
            },
        );
        assert!(classifier().is_content(&rec));

        let blank = RawObjectRecord::new(fixture::id(2).as_str(), "0xa::capy::Capy").with_display(
            DisplayMetadata {
                name: Some("  ".into()),
                description: Some("only a description".into()),
                image_url: None,
            },
        );
        assert!(!classifier().is_content(&blank));
    }

    #[test]
    fn test_capability_never_content() {
        let cap = fixture::owner_cap(&fixture::id(3), &fixture::id(4)).with_display(DisplayMetadata {
            name: Some("Kiosk NFT Owner Cap".into()),
            ..Default::default()
        });
        assert!(!classifier().is_content(&cap));
        assert!(!classifier().is_content(&fixture::coin(&fixture::id(5))));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let rec = fixture::nft(&fixture::id(6), "six");
        let c = classifier();
        let first = c.to_item(&rec, ContainerRef::Direct);
        assert_eq!(first, c.to_item(&rec, ContainerRef::Direct));
        let item = first.unwrap();
        assert_eq!(item.item_id, fixture::id(6));
        assert_eq!(item.display.and_then(|d| d.name).as_deref(), Some("six"));
    }

    #[test]
    fn test_invalid_id_is_dropped() {
        let rec = RawObjectRecord::new("0x6", "0xa::collection::Nft");
        assert!(classifier().is_content(&rec));
        assert!(classifier().to_item(&rec, ContainerRef::Direct).is_none());
    }
}
