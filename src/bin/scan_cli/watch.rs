use anyhow::Result;
use clap::Args;
use tracing::warn;

use super::output::{format_update, to_json_line};
use super::ScanContext;

#[derive(Args)]
pub struct WatchCmd {
    /// Wallet address (0x + 64 hex characters)
    pub address: String,
}

impl WatchCmd {
    /// With `--json`, each update is printed as one JSON line.
    pub async fn execute(&self, ctx: &ScanContext) -> Result<()> {
        let json = ctx.json;
        ctx.discovery
            .discover_progressive(&self.address, |update| {
                if json {
                    match to_json_line(&update) {
                        Ok(line) => println!("{}", line),
                        Err(err) => warn!(error = %err, "failed to encode update"),
                    }
                } else {
                    print!("{}", format_update(&update));
                }
            })
            .await?;
        Ok(())
    }
}
