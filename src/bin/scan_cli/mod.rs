//! Subcommands of `kiosk-scan`.

pub mod discover;
pub mod output;
pub mod plan;
pub mod watch;

use sui_kiosk::Discovery;

/// Shared state handed to every subcommand.
pub struct ScanContext {
    pub discovery: Discovery,
    pub json: bool,
}

impl ScanContext {
    pub fn new(discovery: Discovery, json: bool) -> Self {
        Self { discovery, json }
    }
}
