//! `bulkdl fetch <id>` – download one ID.

use anyhow::Result;
use bulkdl_core::config::BulkConfig;
use bulkdl_core::scheduler;
use bulkdl_core::task::TaskOutcome;

pub async fn run_fetch(cfg: &BulkConfig, id: u64) -> Result<()> {
    match scheduler::fetch_one(cfg, id).await? {
        TaskOutcome::Saved { path, bytes } => {
            println!("Saved {} ({} bytes)", path.display(), bytes)
        }
        TaskOutcome::Skipped(reason) => {
            println!("Skipped {}: {}", reason.path().display(), reason)
        }
        TaskOutcome::Failed(e) => println!("Failed id {}: {}", id, e),
    }
    Ok(())
}
