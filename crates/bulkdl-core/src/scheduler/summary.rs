//! Aggregate counters for one run.

use std::fmt;

use crate::task::{OutcomeKind, TaskOutcome};

/// Counts of launched tasks and how they ended. Informational only: a run
/// with failures still completes normally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub launched: u64,
    pub saved: u64,
    pub skipped: u64,
    pub warned: u64,
    pub failed: u64,
    /// Bytes written across all saved files.
    pub bytes: u64,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &TaskOutcome) {
        match outcome.kind() {
            OutcomeKind::Success => self.saved += 1,
            OutcomeKind::Skipped => self.skipped += 1,
            OutcomeKind::Warning => self.warned += 1,
            OutcomeKind::Error => self.failed += 1,
        }
        if let TaskOutcome::Saved { bytes, .. } = outcome {
            self.bytes += bytes;
        }
    }

    /// Tasks that have reported an outcome.
    pub fn finished(&self) -> u64 {
        self.saved + self.skipped + self.warned + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} launched: {} saved ({} bytes), {} skipped, {} warnings, {} errors",
            self.launched, self.saved, self.bytes, self.skipped, self.warned, self.failed
        )
    }
}
