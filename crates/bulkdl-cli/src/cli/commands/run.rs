//! `bulkdl run` – download the whole ID range.

use anyhow::Result;
use bulkdl_core::config::BulkConfig;
use bulkdl_core::scheduler;

pub async fn run_range(cfg: &BulkConfig) -> Result<()> {
    let summary = scheduler::run_range(cfg).await?;
    println!("{}", summary);
    if summary.warned + summary.failed > 0 {
        println!("See the log for per-ID warnings and errors.");
    }
    Ok(())
}
