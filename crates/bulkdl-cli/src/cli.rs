//! CLI for the bulkdl ID-range downloader.

mod commands;

use anyhow::Result;
use bulkdl_core::config::{self, BulkConfig, Pacing};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use commands::{run_config, run_fetch, run_range};

/// Top-level CLI for bulkdl.
#[derive(Debug, Parser)]
#[command(name = "bulkdl")]
#[command(about = "bulkdl: download every file in a numeric ID range", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/bulkdl/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every ID in the configured range.
    Run {
        /// First ID (inclusive).
        #[arg(long, value_name = "N")]
        start: Option<u64>,
        /// Last ID (inclusive).
        #[arg(long, value_name = "N")]
        end: Option<u64>,
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Download a single ID.
    Fetch {
        /// ID to substitute into the URL template.
        id: u64,
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Print the config file path and the effective configuration.
    Config,
}

/// Per-run overrides of config file values.
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// URL template; `{id}` is replaced by the ID, otherwise the ID is appended.
    #[arg(long, value_name = "TEMPLATE")]
    pub base_url: Option<String>,

    /// Destination directory (created if missing).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Run at most N downloads at once (pool pacing).
    #[arg(long, value_name = "N", conflicts_with = "launch_delay_ms")]
    pub workers: Option<usize>,

    /// Wait MS milliseconds before each launch, with no cap on downloads in flight.
    #[arg(long, value_name = "MS")]
    pub launch_delay_ms: Option<u64>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Never store files with this extension (repeatable; replaces the configured list).
    #[arg(long = "skip-ext", value_name = "EXT", conflicts_with = "no_skip_ext")]
    pub skip_ext: Vec<String>,

    /// Store files regardless of extension.
    #[arg(long)]
    pub no_skip_ext: bool,

    /// Use Content-Disposition filenames verbatim.
    #[arg(long)]
    pub no_sanitize: bool,
}

impl Overrides {
    pub fn apply(&self, cfg: &mut BulkConfig) {
        if let Some(url) = &self.base_url {
            cfg.base_url = url.clone();
        }
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if let Some(workers) = self.workers {
            cfg.pacing = Pacing::Pool { workers };
        }
        if let Some(launch_delay_ms) = self.launch_delay_ms {
            cfg.pacing = Pacing::Interval { launch_delay_ms };
        }
        if let Some(secs) = self.timeout_secs {
            cfg.request_timeout_secs = secs;
        }
        if self.no_skip_ext {
            cfg.skip_extensions.clear();
        } else if !self.skip_ext.is_empty() {
            cfg.skip_extensions = self
                .skip_ext
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect();
        }
        if self.no_sanitize {
            cfg.sanitize_filenames = false;
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<BulkConfig> {
    match path {
        Some(p) => config::load_from_path(p),
        None => config::load_or_init(),
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut cfg = load_config(self.config.as_deref())?;

        match self.command {
            CliCommand::Run {
                start,
                end,
                overrides,
            } => {
                if let Some(start) = start {
                    cfg.id_start = start;
                }
                if let Some(end) = end {
                    cfg.id_end = end;
                }
                overrides.apply(&mut cfg);
                tracing::debug!("effective config: {:?}", cfg);
                run_range(&cfg).await?;
            }
            CliCommand::Fetch { id, overrides } => {
                overrides.apply(&mut cfg);
                run_fetch(&cfg, id).await?;
            }
            CliCommand::Config => run_config(self.config.as_deref(), &cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
