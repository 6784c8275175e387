//! Launch loop over a range of IDs under one pacing policy.
//!
//! `Pool` keeps up to `workers` tasks in flight; when one finishes, the next
//! ID is started until the range is exhausted. `Interval` sleeps before every
//! launch (including the first) and never caps tasks in flight. Either way
//! every launched task is joined before returning.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};

use crate::config::Pacing;
use crate::task::TaskOutcome;

use super::summary::RunSummary;

/// Runs `job` once per ID on tokio's blocking pool and returns the tally.
///
/// `job` must log its own outcome; the driver only counts.
pub async fn drive<F>(ids: RangeInclusive<u64>, pacing: Pacing, job: Arc<F>) -> RunSummary
where
    F: Fn(u64) -> TaskOutcome + Send + Sync + 'static,
{
    let mut summary = RunSummary::default();
    let mut join_set = JoinSet::new();

    match pacing {
        Pacing::Pool { workers } => {
            let workers = workers.max(1);
            let mut ids = ids;
            loop {
                while join_set.len() < workers {
                    let Some(id) = ids.next() else {
                        break;
                    };
                    launch(&mut join_set, &job, id);
                    summary.launched += 1;
                }

                let Some(res) = join_set.join_next().await else {
                    break;
                };
                settle(&mut summary, res);
            }
        }
        Pacing::Interval { launch_delay_ms } => {
            let delay = Duration::from_millis(launch_delay_ms);
            for id in ids {
                tokio::time::sleep(delay).await;
                launch(&mut join_set, &job, id);
                summary.launched += 1;
            }
            while let Some(res) = join_set.join_next().await {
                settle(&mut summary, res);
            }
        }
    }

    summary
}

fn launch<F>(join_set: &mut JoinSet<TaskOutcome>, job: &Arc<F>, id: u64)
where
    F: Fn(u64) -> TaskOutcome + Send + Sync + 'static,
{
    let job = Arc::clone(job);
    join_set.spawn_blocking(move || job(id));
}

fn settle(summary: &mut RunSummary, res: Result<TaskOutcome, JoinError>) {
    match res {
        Ok(outcome) => summary.record(&outcome),
        Err(e) => {
            tracing::error!(outcome = "error", "download task did not complete: {}", e);
            summary.failed += 1;
        }
    }
}
