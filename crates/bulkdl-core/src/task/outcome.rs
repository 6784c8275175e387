//! Task outcomes and how each one is logged.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::fetch::FetchError;
use crate::storage::StorageError;

/// Non-error reasons a task ends without writing a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The derived filename carries an extension from the skip list.
    RejectedExtension { path: PathBuf, extension: String },
    /// A file is already stored under the derived name.
    AlreadyExists { path: PathBuf },
    /// The server answered 2xx with an empty body.
    EmptyBody { path: PathBuf },
}

impl SkipReason {
    pub fn path(&self) -> &Path {
        match self {
            SkipReason::RejectedExtension { path, .. }
            | SkipReason::AlreadyExists { path }
            | SkipReason::EmptyBody { path } => path,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::RejectedExtension { extension, .. } => {
                write!(f, "received .{} file", extension)
            }
            SkipReason::AlreadyExists { .. } => write!(f, "file already exists"),
            SkipReason::EmptyBody { .. } => write!(f, "no data received"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("download failed with HTTP status {0}")]
    HttpStatus(u32),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TaskError {
    /// Non-success statuses are warnings; everything else is an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, TaskError::HttpStatus(_))
    }
}

/// Coarse classification used for log levels and run counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Skipped,
    Warning,
    Error,
}

impl OutcomeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::Skipped => "skipped",
            OutcomeKind::Warning => "warning",
            OutcomeKind::Error => "error",
        }
    }
}

/// How one task ended.
#[derive(Debug)]
pub enum TaskOutcome {
    Saved { path: PathBuf, bytes: u64 },
    Skipped(SkipReason),
    Failed(TaskError),
}

impl TaskOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            TaskOutcome::Saved { .. } => OutcomeKind::Success,
            TaskOutcome::Skipped(_) => OutcomeKind::Skipped,
            TaskOutcome::Failed(e) if e.is_warning() => OutcomeKind::Warning,
            TaskOutcome::Failed(_) => OutcomeKind::Error,
        }
    }

    /// Emits the single log line for this outcome.
    pub fn log(&self, url: &str) {
        let outcome = self.kind().as_str();
        match self {
            TaskOutcome::Saved { path, bytes } => tracing::info!(
                outcome,
                url,
                path = %path.display(),
                "downloaded {} bytes",
                bytes
            ),
            TaskOutcome::Skipped(reason) => tracing::info!(
                outcome,
                url,
                path = %reason.path().display(),
                "{}, skipping",
                reason
            ),
            TaskOutcome::Failed(TaskError::Storage(e)) => tracing::error!(
                outcome,
                url,
                path = %e.path().display(),
                "{}",
                e
            ),
            TaskOutcome::Failed(TaskError::Fetch(e)) if e.is_timeout() => {
                tracing::error!(outcome, url, timed_out = true, "{}", e)
            }
            TaskOutcome::Failed(e) if e.is_warning() => tracing::warn!(outcome, url, "{}", e),
            TaskOutcome::Failed(e) => tracing::error!(outcome, url, "{}", e),
        }
    }
}
