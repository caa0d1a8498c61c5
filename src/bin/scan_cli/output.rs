//! Output formatting for kiosk-scan
//!
//! Human-readable text for terminals, JSON for scripts.

use anyhow::Result;
use serde::Serialize;
use sui_kiosk::types::{
    ContainerCapability, ContentItem, DiscoveryResult, DiscoveryUpdate, ReconciliationTarget,
    TargetStatus,
};

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn to_json_line<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn format_container(out: &mut String, cap: &ContainerCapability) {
    out.push_str(&format!(
        "  kiosk {}  ({} items, cap {})\n",
        cap.container_id,
        cap.item_count,
        cap.capability_id.short()
    ));
}

fn format_item(out: &mut String, item: &ContentItem) {
    let name = item
        .display
        .as_ref()
        .and_then(|d| d.name.as_deref())
        .unwrap_or("-");
    out.push_str(&format!("    {}  {}  {}\n", item.item_id, name, item.type_tag));
}

pub fn format_discovery(result: &DiscoveryResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Kiosks: {}\n", result.containers.len()));
    for cap in &result.containers {
        format_container(&mut out, cap);
        for item in result.items_in(&cap.container_id) {
            format_item(&mut out, item);
        }
    }

    let direct: Vec<&ContentItem> = result.direct_items().collect();
    out.push_str(&format!("\nHeld directly: {}\n", direct.len()));
    for item in direct {
        format_item(&mut out, item);
    }
    out.push_str(&format!("\nTotal items: {}\n", result.items.len()));
    out
}

pub fn format_update(update: &DiscoveryUpdate) -> String {
    let mut out = String::new();
    match update {
        DiscoveryUpdate::Containers(caps) => {
            out.push_str(&format!("Kiosks: {}\n", caps.len()));
            for cap in caps {
                format_container(&mut out, cap);
            }
        }
        DiscoveryUpdate::Items(items) => {
            out.push_str(&format!("+{} items\n", items.len()));
            for item in items {
                format_item(&mut out, item);
                out.push_str(&format!("      in {}\n", item.container_id));
            }
        }
        DiscoveryUpdate::Done => out.push_str("Done\n"),
    }
    out
}

pub fn format_targets(targets: &[ReconciliationTarget]) -> String {
    let mut out = String::new();
    for target in targets {
        let detail = match (target.status, &target.container_id) {
            (TargetStatus::Success, Some(kiosk)) => format!("reuse kiosk {}", kiosk),
            (TargetStatus::Success, None) => "create kiosk".to_string(),
            (TargetStatus::Failed, _) => format!(
                "failed: {}",
                target.error.as_deref().unwrap_or("unknown error")
            ),
            (status, _) => format!("{:?}", status).to_lowercase(),
        };
        out.push_str(&format!("{}  {}\n", target.address, detail));
    }
    out
}
