//! Adapter and session status types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::provenance::Provenance;

/// Lifecycle state of one registered adapter within a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdapterState {
    /// Registered, not yet started.
    Pending,
    /// Currently producing records.
    InProgress,
    /// Ran to natural end of stream.
    Done,
    /// Stopped at its record cap; result is partial, not an error.
    Truncated,
    /// Aborted before end of stream.
    Failed {
        /// Human-readable failure reason.
        reason: String,
        /// True when the abort was a cancellation request.
        cancelled: bool,
    },
}

impl AdapterState {
    /// Whether this state is terminal (the adapter will not run again).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AdapterState::Pending | AdapterState::InProgress)
    }

    /// Whether the adapter stopped early due to its record cap.
    pub fn is_truncated(&self) -> bool {
        matches!(self, AdapterState::Truncated)
    }
}

impl fmt::Display for AdapterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in progress"),
            Self::Done => write!(f, "done"),
            Self::Truncated => write!(f, "truncated"),
            Self::Failed { reason, cancelled: true } => write!(f, "cancelled: {reason}"),
            Self::Failed { reason, cancelled: false } => write!(f, "failed: {reason}"),
        }
    }
}

/// Per-adapter outcome recorded by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterReport {
    /// Artifact family this adapter decodes.
    pub provenance: Provenance,
    /// Short label used in progress text, e.g. `audit log (Security)`.
    pub label: String,
    /// Current lifecycle state.
    pub state: AdapterState,
    /// Raw records accepted from the source.
    pub records_read: u64,
    /// Records skipped because they failed to decode.
    pub records_skipped: u64,
    /// Canonical events the records expanded into.
    pub events_emitted: u64,
}

impl AdapterReport {
    /// A fresh report for a registered adapter.
    pub fn pending(provenance: Provenance, label: impl Into<String>) -> Self {
        Self {
            provenance,
            label: label.into(),
            state: AdapterState::Pending,
            records_read: 0,
            records_skipped: 0,
            events_emitted: 0,
        }
    }
}

/// Session lifecycle.
///
/// `Idle → Running → Merged → ReadyForExport`; the per-adapter states
/// inside `Running` live in [`AdapterReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No build has run.
    Idle,
    /// Adapters are being driven sequentially.
    Running,
    /// Every adapter reached a terminal state and the merge completed.
    Merged,
    /// Merged order is available for export and paginated reads.
    ReadyForExport,
}
