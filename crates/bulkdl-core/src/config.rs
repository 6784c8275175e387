use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::url_model::UrlTemplate;

/// How the driver launches tasks over the ID range. Exactly one policy applies per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Pacing {
    /// Bounded worker pool: at most `workers` tasks in flight, no launch delay.
    Pool { workers: usize },
    /// Sleep `launch_delay_ms` before every launch; the driver itself puts no
    /// cap on tasks in flight. Tasks run on tokio's blocking pool, so at most
    /// 512 (tokio's default `max_blocking_threads`) execute at once and the
    /// rest queue there until a thread frees up.
    Interval { launch_delay_ms: u64 },
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::Pool { workers: 8 }
    }
}

/// Configuration errors caught before any task starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("id range is empty: id_start {start} > id_end {end}")]
    EmptyRange { start: u64, end: u64 },
    #[error("pool pacing needs at least one worker")]
    NoWorkers,
    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
    #[error("invalid base_url: {0}")]
    Template(#[from] crate::url_model::TemplateError),
}

/// Global configuration loaded from `~/.config/bulkdl/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkConfig {
    /// URL template. `{id}` is replaced by the ID; without it the ID is appended.
    pub base_url: String,
    /// First ID of the range (inclusive).
    pub id_start: u64,
    /// Last ID of the range (inclusive).
    pub id_end: u64,
    /// Destination directory for stored files.
    pub output_dir: PathBuf,
    /// Whole-request deadline in seconds (connect + transfer).
    pub request_timeout_secs: u64,
    /// Connect deadline in seconds.
    pub connect_timeout_secs: u64,
    /// Extensions (without the dot, case-sensitive) whose files are never stored.
    pub skip_extensions: Vec<String>,
    /// Strip path separators and control characters from header filenames.
    pub sanitize_filenames: bool,
    /// Launch policy for the driver (serialized as a trailing `[pacing]` table).
    pub pacing: Pacing,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            base_url: "https://shop.iflight.com/index.php?route=product/product/download&download_id="
                .to_string(),
            id_start: 0,
            id_end: 1000,
            output_dir: PathBuf::from("Assets"),
            request_timeout_secs: 15 * 60,
            connect_timeout_secs: 30,
            skip_extensions: vec!["bin".to_string()],
            sanitize_filenames: true,
            pacing: Pacing::default(),
        }
    }
}

impl BulkConfig {
    /// Number of IDs in the inclusive range (0 if the range is inverted).
    pub fn range_len(&self) -> u64 {
        if self.id_start > self.id_end {
            0
        } else {
            (self.id_end - self.id_start).saturating_add(1)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Checks range, pacing and timeout, and parses the URL template.
    pub fn validate(&self) -> Result<UrlTemplate, ConfigError> {
        if self.id_start > self.id_end {
            return Err(ConfigError::EmptyRange {
                start: self.id_start,
                end: self.id_end,
            });
        }
        if let Pacing::Pool { workers: 0 } = self.pacing {
            return Err(ConfigError::NoWorkers);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(UrlTemplate::parse(&self.base_url)?)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bulkdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the XDG location, creating a default file if none exists.
pub fn load_or_init() -> Result<BulkConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BulkConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file. Missing keys take their defaults.
pub fn load_from_path(path: &Path) -> Result<BulkConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: BulkConfig = toml::from_str(&data)
        .with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
