//! Session: the owning context for one build.
//!
//! A session holds one timeline store, the per-adapter reports, and
//! the merged order once the pipeline reaches `Merged`. After the
//! pipeline hands a session to a reader it is treated as read-only;
//! the next build request discards it wholesale.

use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use crate::export::{write_interchange, write_interchange_to_path, ExportError};
use crate::pipeline::BuildPolicy;
use crate::store::TimelineStore;
use crate::types::{AdapterReport, CanonicalEvent, SessionState};

/// Error raised by session-level calls.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Export requested before the session reached `ReadyForExport`.
    #[error("no session ready for export (state: {0:?})")]
    NotReady(SessionState),
    /// The export itself failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// One build's worth of timeline state.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) session_id: Uuid,
    pub(crate) state: SessionState,
    pub(crate) store: TimelineStore,
    pub(crate) reports: Vec<AdapterReport>,
    pub(crate) merged: Vec<CanonicalEvent>,
    pub(crate) policy: BuildPolicy,
}

impl Session {
    /// A fresh idle session.
    pub fn new(policy: BuildPolicy) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            state: SessionState::Idle,
            store: TimelineStore::new(),
            reports: Vec::new(),
            merged: Vec::new(),
            policy,
        }
    }

    /// Session identity (stable across the session's lifetime).
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Per-adapter reports in registration order.
    pub fn reports(&self) -> &[AdapterReport] {
        &self.reports
    }

    /// The underlying store, in insertion order.
    pub fn store(&self) -> &TimelineStore {
        &self.store
    }

    /// The merged total order. Empty before the merge has run.
    pub fn merged(&self) -> &[CanonicalEvent] {
        &self.merged
    }

    /// Policy the session was built under.
    pub fn policy(&self) -> &BuildPolicy {
        &self.policy
    }

    /// Whether any adapter stopped at its record cap.
    ///
    /// True means the timeline is a flagged partial result and the
    /// investigator should be told so.
    pub fn is_partial(&self) -> bool {
        self.reports.iter().any(|r| r.state.is_truncated())
    }

    /// Post-build status line.
    pub fn summary(&self) -> String {
        let shown = self.merged.len().min(self.policy.display_window);
        let partial = if self.is_partial() { ", partial result" } else { "" };
        format!(
            "Timeline built: {} event(s) (display: {shown}{partial})",
            self.merged.len()
        )
    }

    /// Paginated read accessor over the merged order.
    ///
    /// Rows beyond the display window are export-only; `offset` is a
    /// row index into the window. Text fields come back untruncated --
    /// use [`display_text`] at the presentation edge.
    pub fn page(&self, offset: usize, limit: usize) -> Vec<(usize, &CanonicalEvent)> {
        let window = self.merged.len().min(self.policy.display_window);
        self.merged[..window]
            .iter()
            .enumerate()
            .skip(offset)
            .take(limit)
            .collect()
    }

    /// Write the full merged timeline (not the display window) to `writer`.
    pub fn export_to<W: Write>(&self, writer: W) -> Result<(), SessionError> {
        self.check_ready()?;
        write_interchange(&self.merged, writer)?;
        Ok(())
    }

    /// Write the interchange file to a filesystem path.
    pub fn export_to_path(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        self.check_ready()?;
        write_interchange_to_path(&self.merged, path)?;
        Ok(())
    }

    fn check_ready(&self) -> Result<(), SessionError> {
        if self.state != SessionState::ReadyForExport {
            return Err(SessionError::NotReady(self.state));
        }
        Ok(())
    }
}

/// Truncate text for display, preserving character boundaries.
///
/// This is the presentation boundary the core never truncates inside;
/// exported files and `page` rows always carry full text.
pub fn display_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
