use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use sui_kiosk::discovery::PlanSummary;
use sui_kiosk::inputs::collect_addresses;
use sui_kiosk::PlannerConfig;

use super::output::{format_targets, print_json};
use super::ScanContext;

#[derive(Args)]
pub struct PlanCmd {
    /// Wallet addresses
    pub addresses: Vec<String>,

    /// File with one address per line (`#` starts a comment)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Addresses resolved concurrently per batch
    #[arg(long, default_value_t = 10)]
    pub batch_size: usize,

    /// Pause between batches in milliseconds
    #[arg(long, default_value_t = 500)]
    pub batch_delay_ms: u64,
}

impl PlanCmd {
    pub async fn execute(&self, ctx: &ScanContext) -> Result<()> {
        let addresses = collect_addresses(&self.addresses, self.file.as_deref())?;
        if addresses.is_empty() {
            bail!("no addresses given; pass them as arguments or with --file");
        }

        let planner = ctx.discovery.planner(PlannerConfig {
            batch_size: self.batch_size.max(1),
            batch_delay: Duration::from_millis(self.batch_delay_ms),
            ..PlannerConfig::default()
        });
        let targets = planner.prepare(&addresses).await?;

        if ctx.json {
            print_json(&serde_json::json!({
                "targets": targets,
                "summary": PlanSummary::of(&targets),
            }))
        } else {
            print!("{}", format_targets(&targets));
            Ok(())
        }
    }
}
