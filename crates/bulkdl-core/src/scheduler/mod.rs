//! ID-range driver.
//!
//! Expands the configured inclusive range into one [`DownloadTask`] per ID,
//! runs them under the configured [`Pacing`], and waits for all of them:
//! config validation → output dir → drive → summary.

mod drive;
mod summary;

pub use drive::drive;
pub use summary::RunSummary;

use anyhow::Result;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{BulkConfig, Pacing};
use crate::storage;
use crate::task::{self, DownloadTask, TaskOutcome, TaskSettings};
use crate::url_model::UrlTemplate;

/// Everything the driver needs for one run, derived from a validated config.
#[derive(Debug, Clone)]
pub struct RangePlan {
    template: UrlTemplate,
    ids: RangeInclusive<u64>,
    output_dir: PathBuf,
    pacing: Pacing,
    settings: TaskSettings,
}

impl RangePlan {
    pub fn from_config(cfg: &BulkConfig) -> Result<Self, crate::config::ConfigError> {
        let template = cfg.validate()?;
        Ok(Self {
            template,
            ids: cfg.id_start..=cfg.id_end,
            output_dir: cfg.output_dir.clone(),
            pacing: cfg.pacing,
            settings: TaskSettings::from_config(cfg),
        })
    }

    pub fn ids(&self) -> RangeInclusive<u64> {
        self.ids.clone()
    }

    pub fn task(&self, id: u64) -> DownloadTask {
        DownloadTask {
            id,
            url: self.template.render(id),
            output_dir: self.output_dir.clone(),
        }
    }
}

/// Downloads every ID in the configured range. Per-task failures are logged
/// and counted, never returned; `Err` means the run could not start.
pub async fn run_range(cfg: &BulkConfig) -> Result<RunSummary> {
    let plan = Arc::new(RangePlan::from_config(cfg)?);
    storage::ensure_output_dir(&plan.output_dir)?;

    tracing::info!(
        "fetching {} ids {}..={} from {} into {} ({:?})",
        cfg.range_len(),
        plan.ids.start(),
        plan.ids.end(),
        plan.template,
        plan.output_dir.display(),
        plan.pacing
    );

    let job_plan = Arc::clone(&plan);
    let job = Arc::new(move |id: u64| task::execute(&job_plan.task(id), &job_plan.settings));
    let summary = drive(plan.ids(), plan.pacing, job).await;

    tracing::info!("run finished: {}", summary);
    Ok(summary)
}

/// Runs a single task for `id` using the configured template and output dir.
pub async fn fetch_one(cfg: &BulkConfig, id: u64) -> Result<TaskOutcome> {
    let template = cfg.validate()?;
    storage::ensure_output_dir(&cfg.output_dir)?;
    let task = DownloadTask {
        id,
        url: template.render(id),
        output_dir: cfg.output_dir.clone(),
    };
    let settings = TaskSettings::from_config(cfg);
    let outcome = tokio::task::spawn_blocking(move || task::execute(&task, &settings))
        .await
        .map_err(|e| anyhow::anyhow!("download task join: {}", e))?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_renders_one_task_per_id() {
        let cfg = BulkConfig {
            base_url: "http://127.0.0.1:9/dl?download_id=".to_string(),
            id_start: 2,
            id_end: 4,
            output_dir: PathBuf::from("out"),
            ..BulkConfig::default()
        };
        let plan = RangePlan::from_config(&cfg).unwrap();
        let tasks: Vec<_> = plan.ids().map(|id| plan.task(id)).collect();
        assert_eq!(tasks.len() as u64, cfg.range_len());
        assert_eq!(tasks[0].url, "http://127.0.0.1:9/dl?download_id=2");
        assert_eq!(tasks[2].url, "http://127.0.0.1:9/dl?download_id=4");
        assert!(tasks.iter().all(|t| t.output_dir == PathBuf::from("out")));
    }

    #[test]
    fn plan_rejects_invalid_config() {
        let cfg = BulkConfig {
            id_start: 10,
            id_end: 1,
            ..BulkConfig::default()
        };
        assert!(RangePlan::from_config(&cfg).is_err());
    }
}
