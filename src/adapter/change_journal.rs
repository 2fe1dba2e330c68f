//! Change-journal adapter.
//!
//! Decodes file-system change-journal entries. The journal reason
//! string becomes the event kind, qualified as `Usn:<reason>` so
//! journal events remain distinguishable from metadata-table events
//! touching the same path.

use serde::{Deserialize, Serialize};

use crate::types::{Provenance, RawIdentity, RawRecord, RawTimestamp};

use super::{ArtifactAdapter, SourceError, DEFAULT_RECORD_CAP};

/// One change-journal entry from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeJournalRecord {
    /// Update sequence number of the entry.
    pub usn: u64,
    /// Reason the entry was written, e.g. `FileCreate`, `FileDelete`.
    pub reason: String,
    /// Path the entry refers to.
    pub path: String,
    /// When the journal entry was written.
    pub at: RawTimestamp,
}

/// Adapter over a change-journal query provider.
pub struct ChangeJournalAdapter<I> {
    records: I,
    cap: usize,
}

impl<I> ChangeJournalAdapter<I> {
    /// Wrap a provider iterator with the default record cap.
    pub fn new(records: I) -> Self {
        Self { records, cap: DEFAULT_RECORD_CAP }
    }

    /// Override the record cap.
    pub fn with_record_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }
}

impl<I> ArtifactAdapter for ChangeJournalAdapter<I>
where
    I: Iterator<Item = Result<ChangeJournalRecord, SourceError>> + Send,
{
    fn provenance(&self) -> Provenance {
        Provenance::ChangeJournal
    }

    fn label(&self) -> &str {
        "change journal"
    }

    fn record_cap(&self) -> usize {
        self.cap
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>, SourceError> {
        let Some(entry) = self.records.next() else {
            return Ok(None);
        };
        let entry = entry?;

        if entry.reason.is_empty() {
            return Err(SourceError::CorruptRecord(format!(
                "journal entry {} has no reason flags",
                entry.usn
            )));
        }

        let detail = format!("USN {}: {} on {}", entry.usn, entry.reason, entry.path);
        Ok(Some(RawRecord::single(
            format!("Usn:{}", entry.reason),
            entry.at,
            RawIdentity::Unknown,
            entry.path,
            detail,
        )))
    }
}
