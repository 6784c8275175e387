//! `bulkdl config` – show where config comes from and what it resolves to.

use anyhow::Result;
use bulkdl_core::config::{self, BulkConfig};
use std::path::Path;

pub fn run_config(explicit: Option<&Path>, cfg: &BulkConfig) -> Result<()> {
    match explicit {
        Some(p) => println!("# config: {}", p.display()),
        None => println!("# config: {}", config::config_path()?.display()),
    }
    print!("{}", toml::to_string_pretty(cfg)?);
    if let Err(e) = cfg.validate() {
        println!("# warning: {}", e);
    }
    Ok(())
}
