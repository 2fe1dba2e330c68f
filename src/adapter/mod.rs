//! Artifact source adapters.
//!
//! An adapter decodes one artifact family into [`RawRecord`]s. Each one
//! is generic over a provider iterator (`Iterator<Item = Result<R,
//! SourceError>>`) so it can be exercised with synthetic records and
//! never touches a live host directly. Adapters are independent of one
//! another; none may assume another has run.
//!
//! ## Failure contract
//!
//! - [`SourceError::CorruptRecord`] aborts just that record; the
//!   pipeline skips it and keeps iterating.
//! - [`SourceError::Unavailable`] aborts the whole adapter; the
//!   pipeline records the partial result and moves on.
//!
//! Nothing an adapter returns can abort the session.

pub mod audit_log;
pub mod change_journal;
pub mod execution_trace;
pub mod file_metadata;
pub mod registry;

use crate::types::{Provenance, RawIdentity, RawRecord};

pub use audit_log::{AuditLogAdapter, AuditLogRecord};
pub use change_journal::{ChangeJournalAdapter, ChangeJournalRecord};
pub use execution_trace::{ExecutionTraceAdapter, ExecutionTraceRecord};
pub use file_metadata::{FileMetadataAdapter, FileMetadataRecord};
pub use registry::{RegistryAdapter, RegistryKeyRecord};

/// Record cap applied when an adapter is built without an explicit one.
pub const DEFAULT_RECORD_CAP: usize = 500;

/// Error raised by an artifact source.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// The source cannot be opened or stopped responding mid-stream
    /// (permissions, missing artifact). Aborts the adapter.
    #[error("artifact source unavailable: {0}")]
    Unavailable(String),
    /// One record failed to decode. Skipped; the adapter keeps going.
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}

/// Format-specific decoder producing raw provenance records.
///
/// The record stream is finite and not restartable once exhausted.
/// `next_record` is the only suspension point an adapter has; the
/// pipeline checks cancellation between calls, never mid-record.
pub trait ArtifactAdapter: Send {
    /// Artifact family this adapter decodes.
    fn provenance(&self) -> Provenance;

    /// Short label for progress text.
    fn label(&self) -> &str;

    /// Upper bound on records this adapter will emit. Reaching it
    /// marks the adapter `Truncated` rather than silently stopping.
    fn record_cap(&self) -> usize;

    /// Decode the next record, `Ok(None)` at end of stream.
    fn next_record(&mut self) -> Result<Option<RawRecord>, SourceError>;
}

/// Classify a provider identity string into a [`RawIdentity`].
///
/// Security-identifier-shaped strings become unresolved tokens (the
/// normalizer may still map well-known ones to readable names); empty
/// strings carry no identity; anything else is taken as an already
/// resolved account name.
pub fn classify_identity(s: &str) -> RawIdentity {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        RawIdentity::Unknown
    } else if looks_like_sid(trimmed) {
        RawIdentity::Token(trimmed.to_string())
    } else {
        RawIdentity::Named(trimmed.to_string())
    }
}

/// Whether a string has security-identifier syntax (`S-1-...`).
pub fn looks_like_sid(s: &str) -> bool {
    let sid_regex = regex_lite::Regex::new(r"^S-1-\d+(-\d+)+$").unwrap();
    sid_regex.is_match(s)
}
