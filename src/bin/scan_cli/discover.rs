use anyhow::Result;
use clap::Args;

use super::output::{format_discovery, print_json};
use super::ScanContext;

#[derive(Args)]
pub struct DiscoverCmd {
    /// Wallet address (0x + 64 hex characters)
    pub address: String,
}

impl DiscoverCmd {
    pub async fn execute(&self, ctx: &ScanContext) -> Result<()> {
        let result = ctx.discovery.discover(&self.address).await?;
        if ctx.json {
            print_json(&result)
        } else {
            print!("{}", format_discovery(&result));
            Ok(())
        }
    }
}
