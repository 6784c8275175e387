//! One download attempt for one ID.
//!
//! A task is a single linear pass: GET, status check, filename derivation,
//! extension and duplicate checks on the response head, buffer the body,
//! create-if-absent write. Every exit is a [`TaskOutcome`] and is logged once.

mod outcome;

pub use outcome::{OutcomeKind, SkipReason, TaskError, TaskOutcome};

use chrono::{Local, NaiveDateTime};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use crate::config::BulkConfig;
use crate::fetch::{self, Fetched, HttpOptions, ResponseHead};
use crate::storage::{self, Persisted};
use crate::url_model::{derive_filename, extension_of};

/// Per-run settings shared by every task.
#[derive(Debug, Clone)]
pub struct TaskSettings {
    pub http: HttpOptions,
    /// Extensions (no dot, case-sensitive) that are never stored.
    pub skip_extensions: Vec<String>,
    pub sanitize_filenames: bool,
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self::from_config(&BulkConfig::default())
    }
}

impl TaskSettings {
    pub fn from_config(cfg: &BulkConfig) -> Self {
        Self {
            http: HttpOptions {
                request_timeout: cfg.request_timeout(),
                connect_timeout: cfg.connect_timeout(),
            },
            skip_extensions: cfg.skip_extensions.clone(),
            sanitize_filenames: cfg.sanitize_filenames,
        }
    }

    fn rejected_extension<'a>(&self, filename: &'a str) -> Option<&'a str> {
        let ext = extension_of(filename)?;
        self.skip_extensions
            .iter()
            .any(|skip| skip == ext)
            .then_some(ext)
    }
}

/// One unit of work: fetch `url` and store the result under `output_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub id: u64,
    pub url: String,
    pub output_dir: PathBuf,
}

/// Runs the task to completion and logs its outcome.
pub fn execute(task: &DownloadTask, settings: &TaskSettings) -> TaskOutcome {
    tracing::debug!(id = task.id, url = %task.url, "task started");
    let outcome = run(task, settings);
    outcome.log(&task.url);
    outcome
}

fn run(task: &DownloadTask, settings: &TaskSettings) -> TaskOutcome {
    let fetched = fetch::fetch(&task.url, &settings.http, |head| {
        judge_head(head, &task.output_dir, settings, Local::now().naive_local())
    });

    match fetched {
        Err(e) => TaskOutcome::Failed(e.into()),
        Ok(Fetched::Stopped { verdict, .. }) => verdict,
        Ok(Fetched::Complete {
            verdict: path,
            body,
            ..
        }) => store(path, &body),
    }
}

/// Decides from the response head alone whether the body is worth reading.
/// Continues with the destination path, or breaks with the final outcome.
fn judge_head(
    head: &ResponseHead,
    output_dir: &Path,
    settings: &TaskSettings,
    now: NaiveDateTime,
) -> ControlFlow<TaskOutcome, PathBuf> {
    if !head.is_success() {
        return ControlFlow::Break(TaskOutcome::Failed(TaskError::HttpStatus(head.status)));
    }

    let filename = derive_filename(head.content_disposition(), settings.sanitize_filenames, now);
    let path = output_dir.join(&filename.name);
    tracing::debug!(
        path = %path.display(),
        source = filename.source.as_str(),
        "resolved filename"
    );

    if let Some(extension) = settings.rejected_extension(&filename.name) {
        return ControlFlow::Break(TaskOutcome::Skipped(SkipReason::RejectedExtension {
            extension: extension.to_string(),
            path,
        }));
    }
    if storage::file_exists(&path) {
        return ControlFlow::Break(TaskOutcome::Skipped(SkipReason::AlreadyExists { path }));
    }
    ControlFlow::Continue(path)
}

fn store(path: PathBuf, body: &[u8]) -> TaskOutcome {
    if body.is_empty() {
        return TaskOutcome::Skipped(SkipReason::EmptyBody { path });
    }
    match storage::persist_new(&path, body) {
        Ok(Persisted::Written(bytes)) => TaskOutcome::Saved { path, bytes },
        // Lost the race to a concurrent task that resolved to the same name.
        Ok(Persisted::AlreadyExists) => TaskOutcome::Skipped(SkipReason::AlreadyExists { path }),
        Err(e) => TaskOutcome::Failed(e.into()),
    }
}
